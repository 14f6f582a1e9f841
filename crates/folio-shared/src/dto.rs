//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the uploaded résumé.
pub const RESUME_FIELD: &str = "resumeFile";

/// Response to a successful résumé upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioResponse {
    pub portfolio_id: String,
    pub portfolio_url: String,
    pub download_url: String,
    pub message: String,
}

impl PortfolioResponse {
    pub fn generated(
        portfolio_id: impl Into<String>,
        portfolio_url: impl Into<String>,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            portfolio_id: portfolio_id.into(),
            portfolio_url: portfolio_url.into(),
            download_url: download_url.into(),
            message: "Portfolio generated successfully.".to_string(),
        }
    }
}
