use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
    exp: usize,
}

/// Verified caller identity taken from the session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: String,
}

pub fn verify_session(token: &str, public_key: &str) -> Result<Identity, &'static str> {
    let dec_key = DecodingKey::from_rsa_pem(public_key.replace("\\n", "\n").as_bytes())
        .map_err(|_| "Invalid public key")?;
    let mut validation = Validation::new(Algorithm::RS256);
    validation.validate_exp = true; // Ensure expiration is checked
    validation.validate_aud = false; // Disable audience check (optional)

    let token_data =
        decode::<Claims>(token, &dec_key, &validation).map_err(|_| "Invalid token")?;

    let claims = token_data.claims;
    // display name is a snapshot; the token may carry neither name nor email
    let display_name = claims
        .name
        .or(claims.email)
        .unwrap_or_else(|| "Anonymous".to_string());

    Ok(Identity {
        user_id: claims.sub,
        display_name,
    })
}
