//! # Folio Core
//!
//! The domain layer of Folio.
//! Portfolio artifacts, the ports that infrastructure must implement, and the
//! upload lifecycle that drives them. No HTTP, filesystem or network code lives here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod routes;
pub mod service;

pub use error::PortfolioError;
