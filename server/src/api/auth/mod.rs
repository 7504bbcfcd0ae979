//! Authentication: password hashing, session tokens, bearer enforcement

pub mod jwt;
pub mod password;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ApiError;
use crate::core::config::AuthConfig;
use crate::data::mongo::models::UserDoc;
use jwt::SessionClaims;

/// Session token issuing and validation
///
/// Tokens are issued at login even when enforcement is disabled, so clients
/// behave identically against development and production servers.
pub struct AuthService {
    enabled: bool,
    signing_key: Vec<u8>,
    audience: String,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            enabled: config.enabled,
            signing_key: config.jwt_secret.as_bytes().to_vec(),
            audience: config.jwt_audience.clone(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Issue a session token for a stored user
    pub fn issue_token(&self, user: &UserDoc) -> Result<String> {
        let id = user
            .id
            .map(|oid| oid.to_hex())
            .ok_or_else(|| anyhow::anyhow!("Cannot issue token for unsaved user"))?;
        jwt::create_session_token(&self.signing_key, &self.audience, &id, user.is_admin)
    }

    pub fn validate_token(&self, token: &str) -> Result<SessionClaims, jwt::JwtError> {
        jwt::validate_session_token(token, &self.signing_key, &self.audience)
    }
}

/// State for the bearer-enforcement middleware
#[derive(Clone)]
pub struct AuthState {
    pub auth: Arc<AuthService>,
}

/// Require a valid bearer token on the request
///
/// When enforcement is disabled the request passes through untouched. When
/// enabled, the validated claims are attached as a request extension for
/// handlers that care about the caller's identity.
pub async fn require_auth(
    State(state): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.auth.is_enabled() {
        return Ok(next.run(request).await);
    }

    let token = bearer_token(&request).ok_or_else(|| {
        ApiError::unauthorized("MISSING_TOKEN", "Authorization bearer token required")
    })?;

    let claims = state
        .auth
        .validate_token(&token)
        .map_err(|e| ApiError::unauthorized("INVALID_TOKEN", e.to_string()))?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Option<String> {
    let value = request.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ").or_else(|| {
        // Some clients send the scheme lowercased
        value.strip_prefix("bearer ")
    })?;
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::oid::ObjectId;

    fn service(enabled: bool) -> AuthService {
        AuthService::new(&AuthConfig {
            enabled,
            jwt_secret: "test-secret".to_string(),
            jwt_audience: "foodtomake-web".to_string(),
        })
    }

    #[test]
    fn test_issue_and_validate_token() {
        let auth = service(true);
        let mut user = UserDoc::with_username("ada");
        user.id = Some(ObjectId::new());
        user.is_admin = true;

        let token = auth.issue_token(&user).unwrap();
        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.id, user.id.unwrap().to_hex());
        assert!(claims.admin);
    }

    #[test]
    fn test_issue_token_requires_saved_user() {
        let auth = service(true);
        let user = UserDoc::with_username("ghost");
        assert!(auth.issue_token(&user).is_err());
    }

    #[test]
    fn test_enabled_flag_carried() {
        assert!(service(true).is_enabled());
        assert!(!service(false).is_enabled());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = Request::builder()
            .header(header::AUTHORIZATION, "Bearer abc.def.ghi")
            .body(axum::body::Body::empty())
            .unwrap();
        assert_eq!(bearer_token(&request).as_deref(), Some("abc.def.ghi"));

        let request = Request::builder()
            .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(bearer_token(&request).is_none());

        let request = Request::builder()
            .body(axum::body::Body::empty())
            .unwrap();
        assert!(bearer_token(&request).is_none());
    }
}
