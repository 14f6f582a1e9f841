use async_trait::async_trait;

/// Generative-content service that renders a résumé as a portfolio page.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Produce a complete, self-contained HTML document from résumé text.
    async fn generate_portfolio_html(&self, resume_text: &str) -> Result<String, GenerationError>;
}

/// Content generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generator is not configured: {0}")]
    NotConfigured(String),

    #[error("Request to generator failed: {0}")]
    Transport(String),

    #[error("Generator responded with status {status}")]
    Status { status: u16, body: String },

    #[error("Generator returned no content")]
    EmptyResponse,

    #[error("Generator did not return an HTML document")]
    InvalidHtml,
}
