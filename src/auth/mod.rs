use axum::http::{HeaderMap, HeaderValue};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config;

pub mod password;

/// Claims embedded in every issued auth token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.token_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email: email.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token generation error: {0}")]
    TokenGeneration(String),

    #[error("token secret is not configured")]
    MissingSecret,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

/// A freshly signed token plus the header fields that carry it back to the
/// client. Every authenticated response rotates the token through these
/// headers, so clients always hold a credential with a fresh expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub uid: String,
    pub expiry: i64,
}

impl IssuedToken {
    /// Write the token into response headers. Header values are ASCII by
    /// construction; a value that fails conversion is logged and skipped.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let pairs = [
            ("access-token", self.token.as_str()),
            ("token-type", "Bearer"),
            ("uid", self.uid.as_str()),
        ];
        for (name, value) in pairs {
            match HeaderValue::from_str(value) {
                Ok(v) => {
                    headers.insert(name, v);
                }
                Err(_) => tracing::error!("could not encode {} response header", name),
            }
        }
        if let Ok(v) = HeaderValue::from_str(&self.expiry.to_string()) {
            headers.insert("expiry", v);
        }
    }
}

/// Sign a new token for the given user.
pub fn issue_token(user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError> {
    let claims = Claims::new(user_id, email);
    let expiry = claims.exp;
    let token = generate_token(&claims)?;

    Ok(IssuedToken {
        token,
        uid: email.to_string(),
        expiry,
    })
}

pub fn generate_token(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().security.token_secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    let header = Header::default();

    encode(&header, claims, &encoding_key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

/// Validate a token and extract its claims. Any decode failure - bad
/// signature, tampered payload, past expiry - collapses to `InvalidToken`.
pub fn decode_token(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().security.token_secret;

    if secret.is_empty() {
        return Err(AuthError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|_| AuthError::InvalidToken)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_round_trip() {
        let user_id = Uuid::new_v4();
        let issued = issue_token(user_id, "reader@example.com").unwrap();

        let claims = decode_token(&issued.token).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "reader@example.com");
        assert!(claims.exp > claims.iat);
        assert_eq!(issued.uid, "reader@example.com");
        assert_eq!(issued.expiry, claims.exp);
    }

    #[test]
    fn tampered_tokens_are_rejected() {
        let issued = issue_token(Uuid::new_v4(), "reader@example.com").unwrap();
        let mut tampered = issued.token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(matches!(decode_token(&tampered), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        assert!(matches!(decode_token("not-a-token"), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn apply_sets_rotation_headers() {
        let issued = issue_token(Uuid::new_v4(), "reader@example.com").unwrap();
        let mut headers = HeaderMap::new();
        issued.apply(&mut headers);

        assert_eq!(headers.get("token-type").unwrap(), "Bearer");
        assert_eq!(headers.get("uid").unwrap(), "reader@example.com");
        assert!(headers.contains_key("access-token"));
        assert!(headers.contains_key("expiry"));
    }
}
