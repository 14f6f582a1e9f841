//! Portfolio lifecycle: validate, reserve an id, extract, generate, persist.
//!
//! Every step after the directory exists rolls the directory back on failure,
//! so a half-written portfolio is never reachable under a public id. The same
//! holds when the caller drops the `create` future mid-flight: the reservation
//! removes its directory on drop unless the HTML was written.

use std::path::PathBuf;
use std::sync::Arc;

use crate::domain::{IdAllocator, PortfolioArtifact, PortfolioId, UploadedDocument};
use crate::error::PortfolioError;
use crate::ports::{ArtifactStorage, ContentGenerator, StorageError, TextExtractor};

/// Directory creation is retried once with a fresh id when it loses a race.
const RESERVE_ATTEMPTS: usize = 2;

/// Creates and loads portfolio artifacts.
pub struct PortfolioService {
    storage: Arc<dyn ArtifactStorage>,
    extractor: Arc<dyn TextExtractor>,
    generator: Arc<dyn ContentGenerator>,
    ids: IdAllocator,
}

impl PortfolioService {
    pub fn new(
        storage: Arc<dyn ArtifactStorage>,
        extractor: Arc<dyn TextExtractor>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            storage,
            extractor,
            generator,
            ids: IdAllocator::default(),
        }
    }

    pub fn with_id_allocator(mut self, ids: IdAllocator) -> Self {
        self.ids = ids;
        self
    }

    /// Turn an uploaded résumé into a stored portfolio.
    pub async fn create(
        &self,
        declared_filename: &str,
        bytes: Vec<u8>,
    ) -> Result<PortfolioArtifact, PortfolioError> {
        let document = UploadedDocument::new(declared_filename, bytes)?;
        let (id, directory) = self.reserve().await?;
        let reservation = Reservation::new(self.storage.clone(), id.clone());

        tracing::info!(
            portfolio_id = %id,
            kind = %document.kind,
            size = document.bytes.len(),
            "Reserved portfolio directory"
        );

        let resume_text = match self.extractor.extract(document.bytes, document.kind).await {
            Ok(text) => text,
            Err(e) => {
                reservation.rollback().await;
                return Err(PortfolioError::ParsingFailed(e));
            }
        };

        tracing::debug!(
            portfolio_id = %id,
            chars = resume_text.chars().count(),
            preview = %preview(&resume_text, 200),
            "Extracted resume text"
        );

        let html = match self.generator.generate_portfolio_html(&resume_text).await {
            Ok(html) => html,
            Err(e) => {
                reservation.rollback().await;
                return Err(PortfolioError::GenerationFailed(e));
            }
        };

        let html_path = match self.storage.write_html(&id, &html).await {
            Ok(path) => path,
            Err(e) => {
                reservation.rollback().await;
                return Err(PortfolioError::PersistFailed(e));
            }
        };

        reservation.commit();
        tracing::info!(portfolio_id = %id, bytes = html.len(), "Portfolio generated");

        Ok(PortfolioArtifact::new(id, directory, html_path))
    }

    /// Read the stored HTML of a portfolio.
    pub async fn load_html(&self, id: &str) -> Result<Vec<u8>, PortfolioError> {
        let filename = format!("{id}.html");
        self.storage
            .read(id, &filename)
            .await
            .map_err(|e| match e {
                StorageError::NotFound => PortfolioError::NotFound,
                other => {
                    tracing::warn!(portfolio_id = %id, error = %other, "Could not read portfolio");
                    PortfolioError::NotFound
                }
            })
    }

    async fn reserve(&self) -> Result<(PortfolioId, PathBuf), PortfolioError> {
        for attempt in 1..=RESERVE_ATTEMPTS {
            let storage = &self.storage;
            let id = self
                .ids
                .allocate(|candidate| async move { storage.exists(&candidate).await })
                .await
                .map_err(|e| PortfolioError::StorageUnavailable(e.to_string()))?;

            match self.storage.create_dir(&id).await {
                Ok(directory) => return Ok((id, directory)),
                Err(StorageError::AlreadyExists) => {
                    tracing::warn!(
                        portfolio_id = %id,
                        attempt,
                        "Portfolio directory appeared concurrently"
                    );
                }
                Err(e) => {
                    return Err(PortfolioError::StorageUnavailable(format!(
                        "could not create directory for portfolio {id}: {e}"
                    )));
                }
            }
        }

        Err(PortfolioError::StorageUnavailable(
            "portfolio id collided on every attempt".to_string(),
        ))
    }
}

/// Owns a freshly created portfolio directory until the HTML is written.
///
/// Dropping an uncommitted reservation schedules removal on the current tokio
/// runtime, which covers a client disconnect or timeout cancelling `create`.
struct Reservation {
    storage: Arc<dyn ArtifactStorage>,
    id: Option<PortfolioId>,
}

impl Reservation {
    fn new(storage: Arc<dyn ArtifactStorage>, id: PortfolioId) -> Self {
        Self {
            storage,
            id: Some(id),
        }
    }

    fn commit(mut self) {
        self.id = None;
    }

    async fn rollback(mut self) {
        if let Some(id) = self.id.take() {
            remove_directory(self.storage.as_ref(), &id).await;
        }
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(portfolio_id = %id, "Portfolio creation cancelled");
                let storage = self.storage.clone();
                handle.spawn(async move {
                    remove_directory(storage.as_ref(), &id).await;
                });
            }
            Err(_) => tracing::error!(
                portfolio_id = %id,
                "Portfolio creation cancelled outside a runtime; directory left behind"
            ),
        }
    }
}

async fn remove_directory(storage: &dyn ArtifactStorage, id: &PortfolioId) {
    match storage.remove(id).await {
        Ok(()) => tracing::debug!(portfolio_id = %id, "Rolled back portfolio directory"),
        Err(e) => tracing::error!(
            portfolio_id = %id,
            error = %e,
            "Failed to clean up portfolio directory"
        ),
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
