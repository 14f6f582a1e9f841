//! # Folio API Server
//!
//! Turns uploaded résumés into hosted portfolio pages.

use actix_web::{
    App, Error, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web,
};
use tracing_actix_web::TracingLogger;

mod config;
mod handlers;
mod middleware;
mod observability;
mod state;
mod telemetry;


use config::AppConfig;
use middleware::auth::ApiKeyMiddleware;
use middleware::rate_limit::RateLimitMiddleware;
use observability::RequestIdMiddleware;
use state::AppState;
use telemetry::TelemetryConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Folio API Server on {}:{}",
        config.host,
        config.port
    );

    let state = AppState::new(&config).inspect_err(|e| {
        tracing::error!(error = %e, "Failed to initialize application state");
    })?;

    HttpServer::new(move || app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await
}

/// Build the application: request id, API key gate, then rate limits.
fn app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RateLimitMiddleware::new(state.limiter.clone()))
        .wrap(ApiKeyMiddleware::new(state.gate.clone()))
        .wrap(RequestIdMiddleware)
        .wrap(TracingLogger::default())
        .app_data(web::Data::new(state))
        .configure(handlers::configure_routes)
}
