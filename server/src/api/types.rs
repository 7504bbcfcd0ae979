//! Shared API types
//!
//! Common types used across all API endpoints including error handling and
//! paging defaults.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::core::constants::DEFAULT_SEARCH_LIMIT;
use crate::data::DataError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    Unauthorized { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unauthorized(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unauthorized {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    /// Map a data-layer error to a response, hiding internal detail
    pub fn from_data(e: DataError) -> Self {
        match &e {
            DataError::InvalidId(id) => {
                Self::bad_request("INVALID_ID", format!("Invalid id: {}", id))
            }
            DataError::NotFound(what) => Self::not_found("NOT_FOUND", what.clone()),
            DataError::Storage(_) => {
                tracing::error!(error = %e, "Photo storage error");
                Self::service_unavailable("Photo storage unavailable")
            }
            _ => {
                tracing::error!(error = %e, "Data error");
                Self::Internal {
                    message: "Database operation failed".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::ServiceUnavailable { message } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}

fn default_limit() -> i64 {
    DEFAULT_SEARCH_LIMIT
}

/// Result-window parameters shared by search and lookup endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: u64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

impl PageParams {
    /// Clamp to sane bounds; a zero or negative limit falls back to the
    /// default page size
    pub fn clamped(self) -> Self {
        let limit = if self.limit <= 0 {
            DEFAULT_SEARCH_LIMIT
        } else {
            self.limit.min(500)
        };
        Self {
            limit,
            offset: self.offset,
        }
    }
}

/// Query-string paging for list endpoints
///
/// Kept flat (no nested flatten) because the query-string deserializer
/// cannot handle flattened numeric fields.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<u64>,
}

impl ListParams {
    pub fn page(self) -> PageParams {
        PageParams {
            limit: self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
            offset: self.offset.unwrap_or(0),
        }
        .clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_page_defaults_and_clamps() {
        let page = ListParams::default().page();
        assert_eq!(page.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(page.offset, 0);

        let page = ListParams {
            limit: Some(-1),
            offset: Some(7),
        }
        .page();
        assert_eq!(page.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(page.offset, 7);
    }

    #[test]
    fn test_page_params_defaults() {
        let page: PageParams = serde_json::from_str("{}").unwrap();
        assert_eq!(page.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_page_params_clamped() {
        let page = PageParams {
            limit: 0,
            offset: 3,
        }
        .clamped();
        assert_eq!(page.limit, DEFAULT_SEARCH_LIMIT);
        assert_eq!(page.offset, 3);

        let page = PageParams {
            limit: 100_000,
            offset: 0,
        }
        .clamped();
        assert_eq!(page.limit, 500);
    }

    #[test]
    fn test_from_data_maps_invalid_id_to_bad_request() {
        let err = ApiError::from_data(DataError::invalid_id("xyz"));
        assert!(matches!(err, ApiError::BadRequest { .. }));
    }

    #[test]
    fn test_from_data_maps_not_found() {
        let err = ApiError::from_data(DataError::not_found("recipe"));
        assert!(matches!(err, ApiError::NotFound { .. }));
    }
}
