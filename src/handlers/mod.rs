pub mod example;
pub mod extract;
pub mod health;

pub use example::*;
pub use extract::*;
pub use health::*;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::middleware::logging_middleware;
use crate::services::VatExtractor;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: VatExtractor,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            extractor: VatExtractor::new(),
        }
    }
}

/// Builds the full HTTP surface.
pub fn create_router(config: Config) -> Router {
    Lazy::force(&health::START_TIME);

    let body_limit = config.max_body_bytes();
    let state = AppState::new(config);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/fields", get(fields_handler))
        .route("/example", get(example_handler))
        .route("/example-excel", get(example_excel_handler))
        .route("/extract", post(extract_handler))
        .route("/extract-batch", post(extract_batch_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(axum::middleware::from_fn(logging_middleware)),
        )
}
