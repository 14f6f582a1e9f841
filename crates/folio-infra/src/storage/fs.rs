//! Filesystem artifact storage: `<root>/<id>/<id>.html`.
//!
//! The directory is the source of truth for id uniqueness. HTML is written to
//! a temporary sibling and renamed into place, so readers never observe a
//! partially written file.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use folio_core::domain::PortfolioId;
use folio_core::ports::{ArtifactStorage, StorageError};

const TEMP_SUFFIX: &str = ".tmp";

/// Stores each portfolio in its own directory below a fixed root.
#[derive(Debug, Clone)]
pub struct FsArtifactStorage {
    root: PathBuf,
}

impl FsArtifactStorage {
    /// Open (and create if missing) the storage root.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;

        tracing::info!(root = %root.display(), "Portfolio storage ready");

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn directory(&self, id: &PortfolioId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn html_path(&self, id: &PortfolioId) -> PathBuf {
        self.directory(id).join(id.html_filename())
    }

    fn temp_path(&self, id: &PortfolioId) -> PathBuf {
        self.directory(id)
            .join(format!("{}{TEMP_SUFFIX}", id.html_filename()))
    }
}

#[async_trait]
impl ArtifactStorage for FsArtifactStorage {
    async fn exists(&self, id: &PortfolioId) -> bool {
        // An unreadable entry falls through to the atomic `create_dir`.
        tokio::fs::try_exists(self.directory(id)).await.unwrap_or(false)
    }

    async fn create_dir(&self, id: &PortfolioId) -> Result<PathBuf, StorageError> {
        let directory = self.directory(id);
        match tokio::fs::create_dir(&directory).await {
            Ok(()) => Ok(directory),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_html(&self, id: &PortfolioId, html: &str) -> Result<PathBuf, StorageError> {
        let temp = self.temp_path(id);
        let target = self.html_path(id);

        tokio::fs::write(&temp, html.as_bytes()).await?;
        tokio::fs::rename(&temp, &target).await?;

        Ok(target)
    }

    async fn remove(&self, id: &PortfolioId) -> Result<(), StorageError> {
        remove_if_exists(&self.temp_path(id)).await?;
        remove_if_exists(&self.html_path(id)).await?;

        match tokio::fs::remove_dir(self.directory(id)).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    async fn resolve(&self, id: &str, filename: &str) -> Result<PathBuf, StorageError> {
        let directory = normalize(&self.root.join(id));
        if directory == self.root || !directory.starts_with(&self.root) {
            tracing::warn!(id, "Rejected portfolio id outside storage root");
            return Err(StorageError::NotFound);
        }

        let path = normalize(&directory.join(filename));
        if path == directory || !path.starts_with(&directory) {
            tracing::warn!(id, filename, "Rejected file path outside portfolio directory");
            return Err(StorageError::NotFound);
        }

        // Symlinks must not lead out of the root either.
        let real = tokio::fs::canonicalize(&path)
            .await
            .map_err(|_| StorageError::NotFound)?;
        if !real.starts_with(&self.root) {
            return Err(StorageError::NotFound);
        }
        match tokio::fs::metadata(&real).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(StorageError::NotFound),
        }

        Ok(path)
    }

    async fn read(&self, id: &str, filename: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(id, filename).await?;

        tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound | ErrorKind::PermissionDenied => StorageError::NotFound,
            _ => StorageError::Io(e),
        })
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), StorageError> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// Resolve `.` and `..` lexically, without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, FsArtifactStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsArtifactStorage::new(dir.path().join("portfolios")).unwrap();
        (dir, storage)
    }

    fn id(raw: &str) -> PortfolioId {
        PortfolioId::parse(raw).unwrap()
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(Path::new("/data/abcde/../../etc/passwd")),
            PathBuf::from("/etc/passwd")
        );
        assert_eq!(
            normalize(Path::new("/data/./abcde/abcde.html")),
            PathBuf::from("/data/abcde/abcde.html")
        );
    }

    #[tokio::test]
    async fn test_create_dir_is_exclusive() {
        let (_tmp, storage) = storage();
        let id = id("abcde");

        assert!(!storage.exists(&id).await);
        storage.create_dir(&id).await.unwrap();
        assert!(storage.exists(&id).await);

        let second = storage.create_dir(&id).await;
        assert!(matches!(second, Err(StorageError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_write_then_read_html() {
        let (_tmp, storage) = storage();
        let id = id("qwert");
        storage.create_dir(&id).await.unwrap();

        let path = storage.write_html(&id, "<!DOCTYPE html><html></html>").await.unwrap();

        assert_eq!(path, storage.root().join("qwert").join("qwert.html"));
        assert!(!storage.temp_path(&id).exists());
        let bytes = storage.read("qwert", "qwert.html").await.unwrap();
        assert_eq!(bytes, b"<!DOCTYPE html><html></html>");
    }

    #[tokio::test]
    async fn test_remove_deletes_file_and_directory() {
        let (_tmp, storage) = storage();
        let id = id("zxcvb");
        storage.create_dir(&id).await.unwrap();
        storage.write_html(&id, "<html>").await.unwrap();
        tokio::fs::write(storage.temp_path(&id), "<ht").await.unwrap();

        storage.remove(&id).await.unwrap();

        assert!(!storage.exists(&id).await);
        assert_eq!(std::fs::read_dir(storage.root()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_remove_missing_directory_is_ok() {
        let (_tmp, storage) = storage();
        storage.remove(&id("nopee")).await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_is_not_found() {
        let (tmp, storage) = storage();
        let id = id("abcde");
        storage.create_dir(&id).await.unwrap();
        storage.write_html(&id, "<html>").await.unwrap();
        std::fs::write(tmp.path().join("secret.txt"), "top secret").unwrap();

        for (id, filename) in [
            ("abcde", "../../etc/passwd"),
            ("abcde", "../../secret.txt"),
            ("abcde", "../abcde/../../secret.txt"),
            ("abcde", "/etc/passwd"),
            ("..", "secret.txt"),
            ("abcde", ".."),
            ("abcde", "."),
        ] {
            assert!(
                matches!(storage.resolve(id, filename).await, Err(StorageError::NotFound)),
                "{id}/{filename} escaped"
            );
            assert!(matches!(
                storage.read(id, filename).await,
                Err(StorageError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let (_tmp, storage) = storage();
        storage.create_dir(&id("abcde")).await.unwrap();

        assert!(matches!(
            storage.resolve("abcde", "abcde.html").await,
            Err(StorageError::NotFound)
        ));
        assert!(matches!(
            storage.read("zzzzz", "zzzzz.html").await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_directory_is_not_a_readable_file() {
        let (_tmp, storage) = storage();
        let id = id("abcde");
        storage.create_dir(&id).await.unwrap();
        std::fs::create_dir(storage.directory(&id).join("nested")).unwrap();

        assert!(matches!(
            storage.resolve("abcde", "nested").await,
            Err(StorageError::NotFound)
        ));
    }
}
