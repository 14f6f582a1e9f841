//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod extraction;
mod generation;
mod rate_limit;
mod storage;

pub use extraction::{ExtractionError, TextExtractor};
pub use generation::{ContentGenerator, GenerationError};
pub use rate_limit::{RateLimitCategory, RateLimitDecision, RateLimitError, RateLimiter};
pub use storage::{ArtifactStorage, StorageError};
