use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::PortfolioId;

/// Where portfolio artifacts live: one directory per id holding `<id>.html`.
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Whether a directory already claims `id`.
    async fn exists(&self, id: &PortfolioId) -> bool;

    /// Atomically create the directory for `id`.
    ///
    /// Must fail with [`StorageError::AlreadyExists`] instead of reusing an
    /// existing directory.
    async fn create_dir(&self, id: &PortfolioId) -> Result<PathBuf, StorageError>;

    /// Write the generated HTML as `<id>/<id>.html`.
    async fn write_html(&self, id: &PortfolioId, html: &str) -> Result<PathBuf, StorageError>;

    /// Remove the HTML file (if any) and the directory of `id`.
    async fn remove(&self, id: &PortfolioId) -> Result<(), StorageError>;

    /// Resolve `<id>/<filename>` to a readable file inside the storage root.
    ///
    /// Anything that escapes the portfolio directory is [`StorageError::NotFound`].
    async fn resolve(&self, id: &str, filename: &str) -> Result<PathBuf, StorageError>;

    /// Resolve and read a stored file.
    async fn read(&self, id: &str, filename: &str) -> Result<Vec<u8>, StorageError>;
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Portfolio directory already exists")]
    AlreadyExists,

    #[error("File not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
