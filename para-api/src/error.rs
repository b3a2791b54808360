//! Error types for para-api
//!
//! Maps the error taxonomy onto HTTP statuses. Validation and not-found
//! failures are reported at the boundary that received the request; store
//! and classifier failures propagate with their message attached, logged
//! server-side, never swallowed. No automatic retries anywhere.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::services::classifier::ClassifierError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Conflict (409) - e.g., inbox item already processed
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Shared secret missing on the integration boundary (401)
    #[error("API key required: {0}")]
    Unauthorized(String),

    /// Shared secret did not match (403)
    #[error("Invalid API key: {0}")]
    Forbidden(String),

    /// Required external credential absent (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Classifier returned output that is not well-formed (502)
    #[error("Classification parse error: {0}")]
    ClassificationParse(String),

    /// Classifier call exceeded its bounded timeout (504)
    #[error("Classifier timeout: {0}")]
    ClassifierTimeout(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<para_common::Error> for ApiError {
    fn from(err: para_common::Error) -> Self {
        use para_common::Error;
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::Config(msg) => ApiError::Config(msg),
            Error::Database(e) => ApiError::Internal(format!("Database error: {}", e)),
            Error::Io(e) => ApiError::Internal(format!("IO error: {}", e)),
            Error::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(format!("Database error: {}", err))
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::MissingCredential => ApiError::Config(err.to_string()),
            ClassifierError::Parse(msg) => ApiError::ClassificationParse(msg),
            ClassifierError::Timeout => ApiError::ClassifierTimeout(err.to_string()),
            ClassifierError::Network(_) | ClassifierError::Api(_, _) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "API_KEY_REQUIRED", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "INVALID_API_KEY", msg),
            ApiError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", msg),
            ApiError::ClassificationParse(msg) => {
                (StatusCode::BAD_GATEWAY, "CLASSIFICATION_PARSE", msg)
            }
            ApiError::ClassifierTimeout(msg) => {
                (StatusCode::GATEWAY_TIMEOUT, "CLASSIFIER_TIMEOUT", msg)
            }
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        if status.is_server_error() {
            tracing::error!(code = error_code, "{}", message);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
