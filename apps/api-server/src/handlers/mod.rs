//! HTTP handlers and route configuration.

mod health;
mod portfolio;

use actix_web::web;

use folio_core::routes::{HEALTH_PATH, UPLOAD_PATH};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route(HEALTH_PATH, web::get().to(health::health_check))
        .route(
            "/api/v1/portfolios/{portfolio_id}/download",
            web::get().to(portfolio::download_portfolio),
        )
        .route(
            "/{portfolio_id:[a-zA-Z0-9]{5}}",
            web::get().to(portfolio::view_portfolio),
        )
        // Protected routes
        .route(UPLOAD_PATH, web::post().to(portfolio::upload_resume));
}
