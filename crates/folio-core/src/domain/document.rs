use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;

/// Supported résumé formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Detect the kind from a filename extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// An uploaded document that passed filename validation.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub kind: DocumentKind,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    /// Validate the declared filename and body of an upload.
    pub fn new(declared_filename: &str, bytes: Vec<u8>) -> Result<Self, PortfolioError> {
        let filename = clean_filename(declared_filename);

        if filename.is_empty() {
            return Err(PortfolioError::InvalidInput(
                "A file name is required.".to_string(),
            ));
        }
        if filename.contains("..") {
            return Err(PortfolioError::InvalidInput(format!(
                "Sorry! Filename contains invalid path sequence {filename}"
            )));
        }
        let kind = DocumentKind::from_filename(&filename).ok_or_else(|| {
            PortfolioError::InvalidInput(format!(
                "Invalid file type. Only PDF and DOCX are allowed. Received: {filename}"
            ))
        })?;
        if bytes.is_empty() {
            return Err(PortfolioError::InvalidInput(format!(
                "Uploaded file {filename} is empty."
            )));
        }

        Ok(Self {
            filename,
            kind,
            bytes,
        })
    }
}

fn clean_filename(raw: &str) -> String {
    raw.trim().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_filename() {
        assert_eq!(DocumentKind::from_filename("cv.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("CV.DOCX"), Some(DocumentKind::Docx));
        assert_eq!(DocumentKind::from_filename("cv.doc"), None);
        assert_eq!(DocumentKind::from_filename("pdf"), None);
    }

    #[test]
    fn test_rejects_traversal_and_unsupported_types() {
        let traversal = UploadedDocument::new("../../etc/cv.pdf", vec![1]);
        assert!(matches!(traversal, Err(PortfolioError::InvalidInput(_))));

        let backslashes = UploadedDocument::new("..\\cv.pdf", vec![1]);
        assert!(matches!(backslashes, Err(PortfolioError::InvalidInput(_))));

        let wrong_type = UploadedDocument::new("cv.txt", vec![1]);
        assert!(matches!(wrong_type, Err(PortfolioError::InvalidInput(_))));

        let empty = UploadedDocument::new("cv.pdf", Vec::new());
        assert!(matches!(empty, Err(PortfolioError::InvalidInput(_))));
    }

    #[test]
    fn test_accepts_supported_documents() {
        let doc = UploadedDocument::new(" resume.docx ", vec![1, 2, 3]).unwrap();
        assert_eq!(doc.filename, "resume.docx");
        assert_eq!(doc.kind, DocumentKind::Docx);
    }
}
