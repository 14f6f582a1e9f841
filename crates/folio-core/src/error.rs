//! Domain-level error types.

use thiserror::Error;

use crate::ports::{ExtractionError, GenerationError, StorageError};

/// Failures of the portfolio lifecycle.
///
/// Messages are meant for logs. The HTTP layer decides what a caller sees and
/// never forwards the wrapped causes.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Portfolio not found")]
    NotFound,

    #[error("Could not allocate a portfolio id after {attempts} attempts")]
    AllocationExhausted { attempts: usize },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to parse resume file: {0}")]
    ParsingFailed(#[source] ExtractionError),

    #[error("Failed to generate portfolio HTML: {0}")]
    GenerationFailed(#[source] GenerationError),

    #[error("Could not store generated HTML: {0}")]
    PersistFailed(#[source] StorageError),
}
