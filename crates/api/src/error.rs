use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schoolhub_core::error::CoreError;
use serde_json::json;

/// Message shown to the user when a submission could not be saved.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Error adding school. Please try again.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `schoolhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Core(CoreError::Validation(errors)) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "code": "VALIDATION_ERROR",
                    "fields": errors,
                }),
            ),
            AppError::Core(CoreError::Conflict(msg)) => (
                StatusCode::CONFLICT,
                json!({ "error": msg, "code": "CONFLICT" }),
            ),
            AppError::Core(CoreError::Store(err)) => {
                tracing::error!(error = %err, "Record store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": SUBMISSION_FAILED_MESSAGE, "code": "INTERNAL_ERROR" }),
                )
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": msg, "code": "BAD_REQUEST" }),
            ),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({ "error": msg, "code": "PAYLOAD_TOO_LARGE" }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
