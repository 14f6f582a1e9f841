//! In-memory token-bucket rate limiter using governor crate.
//!
//! Each category owns a keyed GCRA limiter. GCRA with a replenish period of
//! `interval / refill` and a burst of `capacity` behaves exactly like a greedy
//! token bucket refilled continuously and capped at `capacity`.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::middleware::StateInformationMiddleware;
use governor::state::keyed::DashMapStateStore;
use governor::{Quota, RateLimiter as GovernorRateLimiter};

use folio_core::ports::{RateLimitCategory, RateLimitDecision, RateLimitError, RateLimiter};

type KeyedRateLimiter<C> =
    GovernorRateLimiter<String, DashMapStateStore<String>, C, StateInformationMiddleware>;

/// Capacity and refill rate of one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketPolicy {
    /// Maximum tokens a bucket holds; also the initial fill.
    pub capacity: u32,
    /// Tokens added over one `interval`.
    pub refill: u32,
    /// Refill window.
    pub interval: Duration,
}

impl BucketPolicy {
    pub const fn per_minute(capacity: u32) -> Self {
        Self {
            capacity,
            refill: capacity,
            interval: Duration::from_secs(60),
        }
    }

    fn quota(&self) -> Result<Quota, RateLimitError> {
        let capacity = NonZeroU32::new(self.capacity)
            .ok_or_else(|| RateLimitError::InvalidPolicy("capacity must be non-zero".to_string()))?;
        if self.refill == 0 {
            return Err(RateLimitError::InvalidPolicy(
                "refill must be non-zero".to_string(),
            ));
        }

        Quota::with_period(self.interval / self.refill)
            .map(|quota| quota.allow_burst(capacity))
            .ok_or_else(|| RateLimitError::InvalidPolicy("interval must be non-zero".to_string()))
    }

    fn from_env(prefix: &str, default: Self) -> Self {
        let read = |suffix: &str| {
            std::env::var(format!("{prefix}_{suffix}"))
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
        };

        Self {
            capacity: read("CAPACITY")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(default.capacity),
            refill: read("REFILL")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(default.refill),
            interval: read("WINDOW_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.interval),
        }
    }
}

/// Bucket policies per category.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub upload: BucketPolicy,
    pub general: BucketPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            upload: BucketPolicy::per_minute(3),
            general: BucketPolicy::per_minute(10),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            upload: BucketPolicy::from_env("RATE_LIMIT_UPLOAD", defaults.upload),
            general: BucketPolicy::from_env("RATE_LIMIT_GENERAL", defaults.general),
        }
    }
}

/// In-memory rate limiter keyed by client and category.
///
/// Buckets are created lazily on a client's first request and kept for the
/// lifetime of the process. Limits are per-process, not shared across instances.
pub struct InMemoryRateLimiter<C: Clock = DefaultClock> {
    upload: KeyedRateLimiter<C>,
    general: KeyedRateLimiter<C>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Result<Self, RateLimitError> {
        Self::with_clock(config, DefaultClock::default())
    }

    pub fn from_env() -> Result<Self, RateLimitError> {
        Self::new(RateLimitConfig::from_env())
    }
}

impl<C: Clock + Clone> InMemoryRateLimiter<C> {
    /// Build a limiter driven by a custom clock.
    pub fn with_clock(config: RateLimitConfig, clock: C) -> Result<Self, RateLimitError> {
        let upload: KeyedRateLimiter<C> =
            GovernorRateLimiter::dashmap_with_clock(config.upload.quota()?, clock.clone())
                .with_middleware();
        let general: KeyedRateLimiter<C> =
            GovernorRateLimiter::dashmap_with_clock(config.general.quota()?, clock)
                .with_middleware();

        Ok(Self {
            upload,
            general,
            config,
        })
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn limiter(&self, category: RateLimitCategory) -> &KeyedRateLimiter<C> {
        match category {
            RateLimitCategory::Upload => &self.upload,
            RateLimitCategory::General => &self.general,
        }
    }
}

impl<C> RateLimiter for InMemoryRateLimiter<C>
where
    C: Clock + Clone + Send + Sync,
{
    fn consume(&self, client_key: &str, category: RateLimitCategory) -> RateLimitDecision {
        let limiter = self.limiter(category);

        match limiter.check_key(&client_key.to_string()) {
            Ok(snapshot) => RateLimitDecision::Allowed {
                remaining: snapshot.remaining_burst_capacity(),
            },
            Err(not_until) => RateLimitDecision::Denied {
                retry_after: not_until.wait_time_from(limiter.clock().now()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::clock::FakeRelativeClock;

    fn limiter() -> (InMemoryRateLimiter<FakeRelativeClock>, FakeRelativeClock) {
        let clock = FakeRelativeClock::default();
        let limiter =
            InMemoryRateLimiter::with_clock(RateLimitConfig::default(), clock.clone()).unwrap();
        (limiter, clock)
    }

    fn remaining(decision: RateLimitDecision) -> u32 {
        match decision {
            RateLimitDecision::Allowed { remaining } => remaining,
            RateLimitDecision::Denied { retry_after } => {
                panic!("expected allowed, retry after {retry_after:?}")
            }
        }
    }

    #[test]
    fn test_nth_consume_within_capacity() {
        let (limiter, _clock) = limiter();

        for n in 1..=3 {
            let decision = limiter.consume("10.0.0.1", RateLimitCategory::Upload);
            assert_eq!(remaining(decision), 3 - n);
        }

        let denied = limiter.consume("10.0.0.1", RateLimitCategory::Upload);
        assert!(!denied.is_allowed());
    }

    #[test]
    fn test_general_bucket_has_its_own_capacity() {
        let (limiter, _clock) = limiter();

        for n in 1..=10 {
            let decision = limiter.consume("10.0.0.1", RateLimitCategory::General);
            assert_eq!(remaining(decision), 10 - n);
        }
        assert!(
            !limiter
                .consume("10.0.0.1", RateLimitCategory::General)
                .is_allowed()
        );
    }

    #[test]
    fn test_categories_and_clients_are_independent() {
        let (limiter, _clock) = limiter();

        for _ in 0..3 {
            limiter.consume("a", RateLimitCategory::Upload);
        }
        assert!(!limiter.consume("a", RateLimitCategory::Upload).is_allowed());
        assert!(limiter.consume("a", RateLimitCategory::General).is_allowed());
        assert!(limiter.consume("b", RateLimitCategory::Upload).is_allowed());
    }

    #[test]
    fn test_denial_reports_wait_for_next_token() {
        let (limiter, clock) = limiter();
        for _ in 0..3 {
            limiter.consume("a", RateLimitCategory::Upload);
        }

        // One upload token refills every 20 seconds.
        clock.advance(Duration::from_secs(5));
        match limiter.consume("a", RateLimitCategory::Upload) {
            RateLimitDecision::Denied { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(15));
            }
            other => panic!("expected denial, got {other:?}"),
        }

        clock.advance(Duration::from_secs(15));
        assert_eq!(
            remaining(limiter.consume("a", RateLimitCategory::Upload)),
            0
        );
    }

    #[test]
    fn test_full_interval_replenishes_bucket() {
        let (limiter, clock) = limiter();
        for _ in 0..3 {
            limiter.consume("a", RateLimitCategory::Upload);
        }

        clock.advance(Duration::from_secs(60));

        assert_eq!(
            remaining(limiter.consume("a", RateLimitCategory::Upload)),
            2
        );
    }

    #[test]
    fn test_refill_never_exceeds_capacity() {
        let (limiter, clock) = limiter();
        limiter.consume("a", RateLimitCategory::Upload);

        clock.advance(Duration::from_secs(3600));

        for n in 1..=3 {
            let decision = limiter.consume("a", RateLimitCategory::Upload);
            assert_eq!(remaining(decision), 3 - n);
        }
        assert!(!limiter.consume("a", RateLimitCategory::Upload).is_allowed());
    }

    #[test]
    fn test_concurrent_consumers_share_one_bucket() {
        let (limiter, _clock) = limiter();

        let allowed: usize = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..40)
                .map(|_| {
                    scope.spawn(|| {
                        limiter
                            .consume("203.0.113.9", RateLimitCategory::General)
                            .is_allowed()
                    })
                })
                .collect();
            handles
                .into_iter()
                .map(|h| usize::from(h.join().unwrap()))
                .sum()
        });

        assert_eq!(allowed, 10);
    }

    #[test]
    fn test_rejects_zero_policies() {
        let config = RateLimitConfig {
            upload: BucketPolicy {
                capacity: 0,
                refill: 3,
                interval: Duration::from_secs(60),
            },
            general: BucketPolicy::per_minute(10),
        };
        assert!(matches!(
            InMemoryRateLimiter::new(config),
            Err(RateLimitError::InvalidPolicy(_))
        ));

        let config = RateLimitConfig {
            upload: BucketPolicy::per_minute(3),
            general: BucketPolicy {
                capacity: 10,
                refill: 10,
                interval: Duration::ZERO,
            },
        };
        assert!(InMemoryRateLimiter::new(config).is_err());
    }
}
