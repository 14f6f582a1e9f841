//! Rate limiting port.

use std::fmt;
use std::time::Duration;

use crate::routes::{API_PREFIX, UPLOAD_PATH};

/// Rate limiter trait - per-client admission control.
///
/// Implementations keep one bucket per `(client_key, category)`, created on
/// first use at full capacity. `consume` must be atomic per bucket.
pub trait RateLimiter: Send + Sync {
    /// Take one token from the client's bucket for `category`.
    fn consume(&self, client_key: &str, category: RateLimitCategory) -> RateLimitDecision;
}

/// Independent rate-limit classes, each with its own bucket policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateLimitCategory {
    Upload,
    General,
}

impl RateLimitCategory {
    /// Pick the category for a request path. `None` means the path is not limited.
    pub fn for_path(path: &str) -> Option<Self> {
        if path == UPLOAD_PATH {
            Some(Self::Upload)
        } else if path.starts_with(API_PREFIX) {
            Some(Self::General)
        } else {
            None
        }
    }

    /// Name used in the `X-Rate-Limit-*-{CATEGORY}` headers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "UPLOAD",
            Self::General => "GENERAL",
        }
    }
}

impl fmt::Display for RateLimitCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// A token was taken; `remaining` tokens are left in the bucket.
    Allowed { remaining: u32 },
    /// The bucket is empty; one token becomes available after `retry_after`.
    Denied { retry_after: Duration },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Rejected limiter configuration. Admission itself cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Invalid rate limit policy: {0}")]
    InvalidPolicy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_for_path() {
        assert_eq!(
            RateLimitCategory::for_path("/api/v1/resume/upload"),
            Some(RateLimitCategory::Upload)
        );
        assert_eq!(
            RateLimitCategory::for_path("/api/v1/resume/upload/"),
            Some(RateLimitCategory::General)
        );
        assert_eq!(
            RateLimitCategory::for_path("/api/v1/portfolios/abcde/download"),
            Some(RateLimitCategory::General)
        );
        assert_eq!(RateLimitCategory::for_path("/abcde"), None);
        assert_eq!(RateLimitCategory::for_path("/health"), None);
    }

    #[test]
    fn test_policy_is_the_only_error() {
        let err = RateLimitError::InvalidPolicy("capacity must be non-zero".to_string());
        assert_eq!(err.to_string(), "Invalid rate limit policy: capacity must be non-zero");

        let RateLimitError::InvalidPolicy(reason) = err;
        assert_eq!(reason, "capacity must be non-zero");
    }
}
