//! Rate limiting implementations.

mod memory;

pub use memory::{BucketPolicy, InMemoryRateLimiter, RateLimitConfig};
