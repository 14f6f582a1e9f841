use async_trait::async_trait;

use crate::domain::DocumentKind;

/// Turns an uploaded document into plain text.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>, kind: DocumentKind) -> Result<String, ExtractionError>;
}

/// Text extraction errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Malformed {kind} document: {reason}")]
    Malformed { kind: DocumentKind, reason: String },

    #[error("Document contains no extractable text")]
    Empty,

    #[error("Extraction task failed: {0}")]
    Task(String),
}
