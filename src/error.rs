// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StoreError;

/// HTTP API error with appropriate status codes and client-facing messages.
///
/// Every error response carries the same body shape:
/// `{"success": false, "error": <status>, "message": <string>}`
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request (malformed body, invalid/duplicate fields)
    BadRequest,

    // 401/403, message forwarded from the token verifier
    Auth(AuthError),

    // 404 Not Found
    NotFound,

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 422 Unprocessable Entity
    Unprocessable,

    // 500 Internal Server Error
    InternalServerError,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest => 400,
            ApiError::Auth(err) => err.status_code(),
            ApiError::NotFound => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::Unprocessable => 422,
            ApiError::InternalServerError => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::BadRequest => "bad request".to_string(),
            ApiError::Auth(err) => err.to_string(),
            ApiError::NotFound => "Resource not found".to_string(),
            ApiError::MethodNotAllowed => "method not allowed".to_string(),
            ApiError::Unprocessable => "unprocessable".to_string(),
            ApiError::InternalServerError => "Internal Server Error".to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code(),
            "message": self.message(),
        })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            // Key-set fetch problems are ours, not the client's token
            AuthError::KeySet(detail) => {
                tracing::error!("key set fetch failed: {}", detail);
                ApiError::InternalServerError
            }
            other => ApiError::Auth(other),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Validation(msg) => {
                tracing::debug!("store validation error: {}", msg);
                ApiError::BadRequest
            }
            StoreError::Corrupt(e) => {
                tracing::error!("stored recipe failed to parse: {}", e);
                ApiError::InternalServerError
            }
            StoreError::Sqlx(e) => {
                // Don't expose internal SQL errors to clients
                tracing::error!("database error: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
