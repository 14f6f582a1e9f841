//! Document text extraction for uploaded résumés.

mod docx;
mod pdf;

use async_trait::async_trait;

use folio_core::domain::DocumentKind;
use folio_core::ports::{ExtractionError, TextExtractor};

/// Extracts text from PDF and DOCX uploads on the blocking thread pool.
///
/// Parsing libraries can panic on hostile input; a panicked task is reported
/// as [`ExtractionError::Task`] instead of taking down the worker.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentTextExtractor;

impl DocumentTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for DocumentTextExtractor {
    async fn extract(&self, bytes: Vec<u8>, kind: DocumentKind) -> Result<String, ExtractionError> {
        let size = bytes.len();
        let text = tokio::task::spawn_blocking(move || match kind {
            DocumentKind::Pdf => pdf::extract(&bytes),
            DocumentKind::Docx => docx::extract(&bytes),
        })
        .await
        .map_err(|e| ExtractionError::Task(e.to_string()))??;

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::Empty);
        }

        tracing::debug!(
            %kind,
            bytes = size,
            chars = text.chars().count(),
            "Extracted document text"
        );
        Ok(text.to_string())
    }
}
