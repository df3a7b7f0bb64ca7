use serde::{Deserialize, Serialize};

pub fn des_from_str<T: for<'a> Deserialize<'a> + Serialize>(
    string: &str,
) -> Result<T, serde_json::Error> {
    serde_json::from_str(string)
}

pub fn ser_to_str<T: for<'a> Deserialize<'a> + Serialize>(
    t: &T,
) -> Result<String, serde_json::Error> {
    serde_json::to_string(t)
}

pub fn extract_token(
    headers: &std::collections::HashMap<std::string::String, std::string::String>,
) -> Option<String> {
    headers.get("authorization").and_then(|s| {
        let mut parts = s.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("Bearer"), Some(token)) => Some(token.to_string()),
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HashMap::new();
        headers.insert("authorization".to_string(), "Bearer abc.def.ghi".to_string());
        assert_eq!(extract_token(&headers), Some("abc.def.ghi".to_string()));
    }

    #[test]
    fn rejects_non_bearer_schemes() {
        let mut headers = HashMap::new();
        headers.insert("authorization".to_string(), "Basic dXNlcg==".to_string());
        assert_eq!(extract_token(&headers), None);
        assert_eq!(extract_token(&HashMap::new()), None);
    }
}
