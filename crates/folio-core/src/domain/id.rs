//! Public id generation.

use std::future::Future;

use rand::Rng;
use rand::distributions::Uniform;
use rand::rngs::OsRng;

use super::portfolio::{PORTFOLIO_ID_LENGTH, PortfolioId};
use crate::error::PortfolioError;

const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Default cap on candidates tried by [`IdAllocator::allocate`].
pub const DEFAULT_MAX_ATTEMPTS: usize = 1_000;

/// Generates short, typeable portfolio ids from the OS random source.
///
/// Ids only need to be hard to guess, not secret. Uniqueness is checked
/// against a caller-supplied predicate; the atomic directory creation that
/// follows is what actually guarantees it.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    max_attempts: usize,
}

impl IdAllocator {
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    /// Draw one candidate id.
    pub fn generate(&self) -> PortfolioId {
        let letters = Uniform::from(0..ALPHABET.len());
        let id: String = OsRng
            .sample_iter(letters)
            .take(PORTFOLIO_ID_LENGTH)
            .map(|i| ALPHABET[i] as char)
            .collect();

        PortfolioId::from_generated(id)
    }

    /// Draw candidates until `exists` reports one as free.
    pub async fn allocate<F, Fut>(&self, mut exists: F) -> Result<PortfolioId, PortfolioError>
    where
        F: FnMut(PortfolioId) -> Fut,
        Fut: Future<Output = bool>,
    {
        for _ in 0..self.max_attempts {
            let candidate = self.generate();
            if !exists(candidate.clone()).await {
                return Ok(candidate);
            }
            tracing::debug!(candidate = %candidate, "Portfolio id already taken, retrying");
        }

        Err(PortfolioError::AllocationExhausted {
            attempts: self.max_attempts,
        })
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::future::ready;

    #[test]
    fn test_generated_ids_are_five_lowercase_letters() {
        let allocator = IdAllocator::default();
        for _ in 0..100 {
            let id = allocator.generate();
            assert!(PortfolioId::parse(id.as_str()).is_some(), "bad id {id}");
        }
    }

    #[tokio::test]
    async fn test_never_returns_an_existing_id() {
        let allocator = IdAllocator::default();
        let mut taken = HashSet::new();
        for _ in 0..200 {
            taken.insert(allocator.generate());
        }

        for _ in 0..1_000 {
            let id = allocator.allocate(|c| ready(taken.contains(&c))).await.unwrap();
            assert!(!taken.contains(&id));
        }
    }

    #[tokio::test]
    async fn test_ten_thousand_allocations_are_unique() {
        let allocator = IdAllocator::default();
        let mut seen = HashSet::new();

        for _ in 0..10_000 {
            let id = allocator.allocate(|c| ready(seen.contains(&c))).await.unwrap();
            assert!(seen.insert(id));
        }
        assert_eq!(seen.len(), 10_000);
    }

    #[tokio::test]
    async fn test_gives_up_when_every_candidate_exists() {
        let allocator = IdAllocator::new(25);
        let mut calls = 0;

        let result = allocator
            .allocate(|_| {
                calls += 1;
                ready(true)
            })
            .await;

        assert!(matches!(
            result,
            Err(PortfolioError::AllocationExhausted { attempts: 25 })
        ));
        assert_eq!(calls, 25);
    }
}
