//! Application services orchestrating the ports.

mod portfolio;

pub use portfolio::PortfolioService;
