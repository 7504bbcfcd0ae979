//! JWT session token handling

use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::core::constants::{JWT_ISSUER, SESSION_TTL_HOURS};

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Session token has expired"),
            Self::InvalidSignature => write!(f, "Invalid session token signature"),
            Self::Invalid(msg) => write!(f, "Invalid session token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims for session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User document id (hex)
    pub id: String,
    pub admin: bool,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user_id: &str, admin: bool, audience: &str) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(SESSION_TTL_HOURS);

        Self {
            id: user_id.to_string(),
            admin,
            iss: JWT_ISSUER.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Create a signed session token
pub fn create_session_token(
    signing_key: &[u8],
    audience: &str,
    user_id: &str,
    admin: bool,
) -> Result<String> {
    let claims = SessionClaims::new(user_id, admin, audience);
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a session token
pub fn validate_session_token(
    token: &str,
    signing_key: &[u8],
    audience: &str,
) -> Result<SessionClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[JWT_ISSUER]);
    validation.set_audience(&[audience]);

    let token_data =
        decode::<SessionClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::Invalid(e.to_string()),
            })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        vec![7u8; 32]
    }

    #[test]
    fn test_create_and_validate() {
        let key = test_key();
        let token = create_session_token(&key, "foodtomake-web", "64f001", false).unwrap();
        let claims = validate_session_token(&token, &key, "foodtomake-web").unwrap();
        assert_eq!(claims.id, "64f001");
        assert!(!claims.admin);
        assert_eq!(claims.iss, JWT_ISSUER);
        assert_eq!(claims.aud, "foodtomake-web");
    }

    #[test]
    fn test_admin_claim_round_trips() {
        let key = test_key();
        let token = create_session_token(&key, "foodtomake-web", "64f002", true).unwrap();
        let claims = validate_session_token(&token, &key, "foodtomake-web").unwrap();
        assert!(claims.admin);
    }

    #[test]
    fn test_wrong_key_rejected() {
        let token = create_session_token(&test_key(), "foodtomake-web", "64f003", false).unwrap();
        let result = validate_session_token(&token, &[9u8; 32], "foodtomake-web");
        assert!(matches!(result, Err(JwtError::InvalidSignature)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let key = test_key();
        let token = create_session_token(&key, "foodtomake-web", "64f004", false).unwrap();
        let result = validate_session_token(&token, &key, "other-app");
        assert!(matches!(result, Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_ttl_is_two_hours() {
        let claims = SessionClaims::new("64f005", false, "foodtomake-web");
        assert_eq!(claims.exp - claims.iat, SESSION_TTL_HOURS * 3600);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = validate_session_token("not.a.token", &test_key(), "foodtomake-web");
        assert!(result.is_err());
    }
}
