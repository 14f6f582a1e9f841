//! Application configuration loaded from environment variables.

use std::env;
use std::fmt;
use std::path::PathBuf;

use folio_core::ports::{GenerationError, RateLimitError, StorageError};
use folio_infra::{GeminiConfig, RateLimitConfig};

const DEFAULT_STORAGE_PATH: &str = "./portfolios";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret expected in `X-API-Key`.
    pub api_key: String,
    pub storage_path: PathBuf,
    /// Public base URL used to build portfolio links.
    pub base_url: String,
    pub max_upload_bytes: usize,
    pub rate_limit: RateLimitConfig,
    pub gemini: GeminiConfig,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("storage_path", &self.storage_path)
            .field("base_url", &self.base_url)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("rate_limit", &self.rate_limit)
            .field("gemini", &self.gemini)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            api_key: env::var("APP_SECURITY_API_KEY").unwrap_or_default(),
            storage_path: env::var("PORTFOLIO_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STORAGE_PATH)),
            base_url: env::var("PORTFOLIO_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            rate_limit: RateLimitConfig::from_env(),
            gemini: GeminiConfig::from_env(),
        }
    }
}

/// Startup failures; the server refuses to run with any of these.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid rate limit policy: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Portfolio storage is unusable: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid access rule: {0}")]
    AccessRule(#[from] folio_infra::auth::RuleError),

    #[error("Could not build content generator: {0}")]
    Generator(#[from] GenerationError),
}

impl From<ConfigError> for std::io::Error {
    fn from(err: ConfigError) -> Self {
        std::io::Error::other(err)
    }
}
