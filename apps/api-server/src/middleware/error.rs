//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::RepoError;
use quill_shared::ErrorResponse;
use thiserror::Error;

/// Handler error, rendered as Problem Details.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let problem = match self {
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors),
            AppError::Storage(err) => {
                // Backend messages stay in the log.
                tracing::error!(error = %err, "Storage failure");
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(problem)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
