//! # Error Handling
//!
//! Application-level error type and its mapping to HTTP responses.
//!
//! The translation core has its own `thiserror` types
//! ([`crate::translation::TranslationError`]); this module is the edge where
//! they, `anyhow`, JSON and configuration errors become JSON error bodies.
//!
//! ## Key Rust Concepts:
//! - **enum**: each variant is one category of failure
//! - **From trait**: lets `?` convert foreign errors into `AppError`
//! - **ResponseError trait**: Actix calls it to turn a handler's `Err` into a response

use crate::translation::TranslationError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;

/// Custom error types for the application.
///
/// ## Error Categories:
/// - **Internal**: server-side problems (500)
/// - **BadRequest**: malformed request body (400)
/// - **NotFound**: unknown route (404)
/// - **ConfigError**: configuration problems (500)
/// - **ValidationError**: input failed validation rules (400)
/// - **UpstreamFailure**: every translation provider failed (502)
#[derive(Debug)]
pub enum AppError {
    Internal(String),

    BadRequest(String),

    NotFound(String),

    ConfigError(String),

    ValidationError(String),

    /// One message per failed provider goes into `details`
    UpstreamFailure { message: String, details: Vec<String> },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::UpstreamFailure { message, .. } => write!(f, "Upstream failure: {}", message),
        }
    }
}

impl AppError {
    fn kind(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::UpstreamFailure { .. } => (StatusCode::BAD_GATEWAY, "upstream_failure"),
        }
    }
}

/// JSON body shared by every error:
/// ```json
/// {
///   "error": {
///     "type": "upstream_failure",
///     "message": "all translation providers failed (2 errors)",
///     "timestamp": "2025-01-01T12:00:00Z",
///     "details": ["lingva: HTTP status 503", "mymemory: timed out after 9000 ms"]
///   }
/// }
/// ```
/// `details` is only present for upstream failures.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().0
    }

    fn error_response(&self) -> HttpResponse {
        let (status, error_type) = self.kind();

        let mut body = json!({
            "type": error_type,
            "message": match self {
                AppError::Internal(msg)
                | AppError::BadRequest(msg)
                | AppError::NotFound(msg)
                | AppError::ConfigError(msg)
                | AppError::ValidationError(msg) => msg.clone(),
                AppError::UpstreamFailure { message, .. } => message.clone(),
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let AppError::UpstreamFailure { details, .. } = self {
            body["details"] = json!(details);
        }

        HttpResponse::build(status).json(json!({ "error": body }))
    }
}

/// Invalid input is the caller's fault (400); anything else means the
/// providers let us down (502).
impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::InvalidInput(msg) => AppError::ValidationError(msg),
            other => AppError::UpstreamFailure {
                message: other.to_string(),
                details: other.provider_messages(),
            },
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Malformed JSON is almost always the client's doing, hence 400.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

/// Shorthand for `Result<T, AppError>`.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translation::{ProviderError, ProviderKind};
    use actix_web::body::to_bytes;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err: AppError = TranslationError::InvalidInput("text is empty".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn total_failure_maps_to_bad_gateway_with_details() {
        let err: AppError = TranslationError::AllProvidersFailed {
            errors: vec![
                ProviderError::Status { provider: ProviderKind::Lingva, status: 503 },
                ProviderError::Timeout { provider: ProviderKind::MyMemory, timeout_ms: 9000 },
            ],
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);

        let response = err.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(body["error"]["type"], "upstream_failure");
        assert_eq!(body["error"]["details"].as_array().unwrap().len(), 2);
        assert_eq!(body["error"]["details"][0], "lingva: HTTP status 503");
    }

    #[actix_web::test]
    async fn plain_errors_have_no_details() {
        let response = AppError::NotFound("/nope".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["message"], "/nope");
        assert!(body["error"].get("details").is_none());
    }
}
