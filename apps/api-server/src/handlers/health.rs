//! Liveness endpoint. Reachable without an API key and never rate limited.

use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
    version: &'static str,
    timestamp: String,
}

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Liveness {
        status: "ok",
        version: VERSION,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
