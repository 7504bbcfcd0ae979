//! Login and registration endpoints
//!
//! Login failures are reported in-band: the response always carries the
//! `{user, token, apiError}` envelope with HTTP 200, and clients branch on
//! `apiError.code`. Only transport-level problems surface as HTTP errors.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::auth::AuthService;
use crate::api::routes::users::types::UserResponse;
use crate::api::types::ApiError;
use crate::domain::UserService;
use crate::domain::users::{LoginFailure, LoginOutcome, SocialProvider};

/// Shared state for Auth API endpoints
#[derive(Clone)]
pub struct AuthApiState {
    pub users: Arc<UserService>,
    pub auth: Arc<AuthService>,
}

/// Build Auth API routes
pub fn routes(users: Arc<UserService>, auth: Arc<AuthService>) -> Router<()> {
    let state = AuthApiState { users, auth };

    Router::new()
        .route("/login", post(login))
        .route("/login/social", post(login_social))
        .route("/register", post(register))
        .route("/register/social", post(register_social))
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: Option<UserResponse>,
    pub token: Option<String>,
    pub api_error: Option<ApiErrorBody>,
}

impl LoginResponse {
    fn failure(failure: LoginFailure) -> Self {
        Self {
            user: None,
            token: None,
            api_error: Some(ApiErrorBody {
                code: failure.code.to_string(),
                message: failure.message.to_string(),
            }),
        }
    }

    fn invalid_social_type() -> Self {
        Self {
            user: None,
            token: None,
            api_error: Some(ApiErrorBody {
                code: "INVALID_SOCIAL_TYPE".to_string(),
                message: "socialType must be GOOGLE or FACEBOOK.".to_string(),
            }),
        }
    }
}

fn into_response(
    auth: &AuthService,
    outcome: LoginOutcome,
) -> Result<Json<LoginResponse>, ApiError> {
    match outcome {
        LoginOutcome::Success(user) => {
            let token = auth.issue_token(&user).map_err(|e| {
                tracing::error!(error = %e, "Failed to issue session token");
                ApiError::internal("Failed to issue session token")
            })?;
            Ok(Json(LoginResponse {
                user: Some((*user).into()),
                token: Some(token),
                api_error: None,
            }))
        }
        LoginOutcome::Failure(failure) => Ok(Json(LoginResponse::failure(failure))),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginRequest {
    pub social_type: String,
    pub social_id: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "username must be 1 to 64 characters"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
    #[serde(default)]
    pub profile_picture_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialRegisterRequest {
    pub social_type: String,
    pub social_id: String,
    pub username: String,
}

/// Username and password login
pub async fn login(
    State(state): State<AuthApiState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state
        .users
        .login(&request.username, &request.password)
        .await
        .map_err(ApiError::from_data)?;
    into_response(&state.auth, outcome)
}

/// Login with a Google or Facebook identity
pub async fn login_social(
    State(state): State<AuthApiState>,
    Json(request): Json<SocialLoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(provider) = SocialProvider::parse(&request.social_type) else {
        return Ok(Json(LoginResponse::invalid_social_type()));
    };
    let outcome = state
        .users
        .login_social(provider, &request.social_id)
        .await
        .map_err(ApiError::from_data)?;
    into_response(&state.auth, outcome)
}

/// Create an account with username and password
pub async fn register(
    State(state): State<AuthApiState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::bad_request("VALIDATION_FAILED", e.to_string()))?;
    let outcome = state
        .users
        .register(
            &request.username,
            &request.password,
            request.profile_picture_uri.as_deref(),
        )
        .await
        .map_err(ApiError::from_data)?;
    into_response(&state.auth, outcome)
}

/// Create an account backed by a social identity
pub async fn register_social(
    State(state): State<AuthApiState>,
    Json(request): Json<SocialRegisterRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Some(provider) = SocialProvider::parse(&request.social_type) else {
        return Ok(Json(LoginResponse::invalid_social_type()));
    };
    let outcome = state
        .users
        .register_social(provider, &request.social_id, &request.username)
        .await
        .map_err(ApiError::from_data)?;
    into_response(&state.auth, outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_envelope_shape() {
        let response = LoginResponse::failure(LoginFailure {
            code: "USER_NOT_FOUND",
            message: "A User with that username does not exist.",
        });
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["user"].is_null());
        assert!(json["token"].is_null());
        assert_eq!(json["apiError"]["code"], "USER_NOT_FOUND");
    }

    #[test]
    fn test_invalid_social_type_envelope() {
        let json = serde_json::to_value(LoginResponse::invalid_social_type()).unwrap();
        assert_eq!(json["apiError"]["code"], "INVALID_SOCIAL_TYPE");
    }
}
