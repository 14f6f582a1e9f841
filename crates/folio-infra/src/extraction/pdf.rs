use folio_core::domain::DocumentKind;
use folio_core::ports::ExtractionError;

pub(super) fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Malformed {
        kind: DocumentKind::Pdf,
        reason: e.to_string(),
    })
}
