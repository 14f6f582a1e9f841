use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters in a public portfolio id.
pub const PORTFOLIO_ID_LENGTH: usize = 5;

/// Short public identifier of a portfolio: five lowercase ASCII letters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortfolioId(String);

impl PortfolioId {
    /// Parse a raw id, accepting only ids the allocator could have produced.
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = raw.len() == PORTFOLIO_ID_LENGTH && raw.bytes().all(|b| b.is_ascii_lowercase());
        valid.then(|| Self(raw.to_string()))
    }

    pub(crate) fn from_generated(raw: String) -> Self {
        debug_assert_eq!(raw.len(), PORTFOLIO_ID_LENGTH);
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the HTML file stored inside the portfolio directory.
    pub fn html_filename(&self) -> String {
        format!("{}.html", self.0)
    }
}

impl fmt::Display for PortfolioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PortfolioId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A fully persisted portfolio: its directory and the generated HTML file.
#[derive(Debug, Clone)]
pub struct PortfolioArtifact {
    pub id: PortfolioId,
    pub directory: PathBuf,
    pub html_path: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl PortfolioArtifact {
    pub fn new(id: PortfolioId, directory: PathBuf, html_path: PathBuf) -> Self {
        Self {
            id,
            directory,
            html_path,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_lowercase_ids_only() {
        assert!(PortfolioId::parse("abcde").is_some());
        assert!(PortfolioId::parse("ABCDE").is_none());
        assert!(PortfolioId::parse("abc1e").is_none());
        assert!(PortfolioId::parse("abcd").is_none());
        assert!(PortfolioId::parse("../ab").is_none());
    }

    #[test]
    fn test_html_filename() {
        let id = PortfolioId::parse("qwert").unwrap();
        assert_eq!(id.html_filename(), "qwert.html");
    }
}
