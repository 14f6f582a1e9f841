//! Application state - shared across all handlers and middleware.

use std::sync::Arc;

use folio_core::ports::{ArtifactStorage, ContentGenerator, RateLimiter, TextExtractor};
use folio_core::service::PortfolioService;
use folio_infra::{
    ApiKeyGate, DocumentTextExtractor, FsArtifactStorage, GeminiContentGenerator,
    InMemoryRateLimiter,
};

use crate::config::{AppConfig, ConfigError};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub portfolios: Arc<PortfolioService>,
    pub limiter: Arc<dyn RateLimiter>,
    pub gate: Arc<ApiKeyGate>,
    pub base_url: String,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Build the application state with the production implementations.
    pub fn new(config: &AppConfig) -> Result<Self, ConfigError> {
        let storage = Arc::new(FsArtifactStorage::new(&config.storage_path)?);
        let extractor = Arc::new(DocumentTextExtractor::new());
        let generator = Arc::new(GeminiContentGenerator::new(config.gemini.clone())?);

        tracing::info!(model = %config.gemini.model, "Content generator initialized");

        Self::from_parts(config, storage, extractor, generator)
    }

    /// Build the state around explicit collaborators.
    pub fn from_parts(
        config: &AppConfig,
        storage: Arc<dyn ArtifactStorage>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Result<Self, ConfigError> {
        let limiter = InMemoryRateLimiter::new(config.rate_limit.clone())?;
        let gate = ApiKeyGate::new(config.api_key.clone())?;

        tracing::info!(
            upload = ?config.rate_limit.upload,
            general = ?config.rate_limit.general,
            "Application state initialized"
        );

        Ok(Self {
            portfolios: Arc::new(PortfolioService::new(storage, extractor, generator)),
            limiter: Arc::new(limiter),
            gate: Arc::new(gate),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_upload_bytes: config.max_upload_bytes,
        })
    }
}
