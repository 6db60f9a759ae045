//! VAT Document Extractor Service
//!
//! HTTP service that accepts VAT return uploads and answers with mock
//! extraction results as JSON, xlsx workbooks or CSV.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use handlers::create_router;
