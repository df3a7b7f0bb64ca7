use serde::{Deserialize, Serialize};

/// Subset of the provider's quote payload the gain model consumes.
/// `c` is the last price and `dp` the percent change on the day; the
/// provider may omit either for unknown or thinly traded symbols.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Quote {
    #[serde(rename = "c", default)]
    pub last_price: Option<f64>,
    #[serde(rename = "dp", default)]
    pub percent_change: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_quote() {
        let quote: Quote =
            serde_json::from_str(r#"{"c":189.84,"d":1.35,"dp":0.7163,"pc":188.49}"#).unwrap();
        assert_eq!(quote.last_price, Some(189.84));
        assert_eq!(quote.percent_change, Some(0.7163));
    }

    #[test]
    fn tolerates_missing_and_null_fields() {
        let quote: Quote = serde_json::from_str(r#"{"c":0}"#).unwrap();
        assert_eq!(quote.last_price, Some(0.0));
        assert_eq!(quote.percent_change, None);

        let quote: Quote = serde_json::from_str(r#"{"c":null,"dp":null}"#).unwrap();
        assert_eq!(quote.last_price, None);
        assert_eq!(quote.percent_change, None);

        let quote: Quote = serde_json::from_str("{}").unwrap();
        assert_eq!(quote.percent_change, None);
    }
}
