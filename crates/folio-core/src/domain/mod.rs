//! Domain entities - the core business objects.

mod document;
mod id;
mod portfolio;

pub use document::{DocumentKind, UploadedDocument};
pub use id::{DEFAULT_MAX_ATTEMPTS, IdAllocator};
pub use portfolio::{PORTFOLIO_ID_LENGTH, PortfolioArtifact, PortfolioId};
