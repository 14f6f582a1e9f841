//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`, plus the
//! API key gate used by the HTTP layer.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - Filesystem storage and API key gate only
//! - `rate-limit` - Token-bucket rate limiting via governor
//! - `documents` - PDF and DOCX text extraction
//! - `gemini` - Portfolio generation with Google Gemini

pub mod auth;
pub mod storage;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

#[cfg(feature = "documents")]
pub mod extraction;

#[cfg(feature = "gemini")]
pub mod generation;

pub use auth::{API_KEY_HEADER, ApiKeyGate, GateDecision};
pub use storage::FsArtifactStorage;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{BucketPolicy, InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "documents")]
pub use extraction::DocumentTextExtractor;

#[cfg(feature = "gemini")]
pub use generation::{GeminiConfig, GeminiContentGenerator};
