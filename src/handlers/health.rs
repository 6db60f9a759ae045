use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use once_cell::sync::Lazy;
use std::time::Instant;
use tracing::info;

use crate::models::{FieldSpec, HealthResponse, RootResponse, VAT_FIELDS};

pub const SERVICE_NAME: &str = "vat-extractor";

pub(crate) static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Liveness message
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Your VAT extraction API is running!".to_string(),
    })
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    let uptime_seconds = START_TIME.elapsed().as_secs();

    info!(uptime_seconds, "Health check requested");

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        uptime_seconds,
    })
}

/// Readiness check endpoint (for Kubernetes/Railway). Handlers hold no
/// external dependencies, so a running router is ready.
pub async fn ready_handler() -> StatusCode {
    StatusCode::OK
}

/// The field-code lookup table as JSON.
pub async fn fields_handler() -> Json<&'static [FieldSpec]> {
    Json(VAT_FIELDS)
}
