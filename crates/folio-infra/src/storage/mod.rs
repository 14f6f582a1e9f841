//! Artifact storage implementations.

mod fs;

pub use fs::FsArtifactStorage;
