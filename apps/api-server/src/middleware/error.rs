//! Error handling - maps lifecycle failures onto `{error, message}` responses.

use actix_multipart::MultipartError;
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use folio_core::PortfolioError;
use folio_shared::ErrorResponse;
use std::fmt;

/// Body of every 500 that has no more specific message.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please retry.";

/// Application-level error type.
///
/// Messages carried here are shown to the caller as-is; causes are logged
/// when the error is created and never rendered.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl AppError {
    pub fn unexpected() -> Self {
        AppError::Internal(UNEXPECTED_ERROR_MESSAGE.to_string())
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::BadRequest(message) => ErrorResponse::bad_request(message),
            AppError::NotFound(message) => ErrorResponse::not_found(message),
            AppError::Internal(message) => ErrorResponse::internal_error(message),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<PortfolioError> for AppError {
    fn from(err: PortfolioError) -> Self {
        match err {
            PortfolioError::InvalidInput(msg) => AppError::BadRequest(msg),
            PortfolioError::NotFound => AppError::NotFound("Portfolio not found".to_string()),
            PortfolioError::ParsingFailed(_) => {
                tracing::error!(error = %err, "Resume parsing failed");
                AppError::unexpected()
            }
            PortfolioError::GenerationFailed(_) => {
                tracing::error!(error = %err, "Portfolio generation failed");
                AppError::unexpected()
            }
            PortfolioError::AllocationExhausted { .. }
            | PortfolioError::StorageUnavailable(_)
            | PortfolioError::PersistFailed(_) => {
                tracing::error!(error = %err, "Portfolio storage failed");
                AppError::unexpected()
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        tracing::warn!(error = %err, "Malformed multipart upload");
        AppError::BadRequest("Malformed multipart upload.".to_string())
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
