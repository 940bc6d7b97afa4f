//! # catalog-api: HTTP Server for the Catalog Service
//!
//! Axum application exposing categories, products and discounts.
//!
//! ## Request Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP request                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  log_requests middleware (method, path, status, elapsed_ms)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Router ── /health                                                      │
//! │       └─── {base_path}/categories/ /products/ /discounts/               │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  handler ──► catalog-db (store) ──► catalog-core (pricing)              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │  JSON body, or {"error": "..."} via ApiError                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The binary in `main.rs` only wires configuration, the database and the
//! listener; everything routable lives here so integration tests can drive
//! [`build_router`] directly.

pub mod config;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pagination;
pub mod routes;
pub mod state;
pub mod views;

pub use config::{AppConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use state::AppState;

use axum::middleware;
use axum::routing::get;
use axum::Router;

/// Builds the complete application router.
pub fn build_router(state: AppState) -> Router {
    let base_path = state.config.server.normalized_base_path().to_string();
    let catalog = routes::catalog_routes();

    let app = Router::new().route("/health", get(routes::health::health));
    let app = if base_path.is_empty() {
        app.merge(catalog)
    } else {
        app.nest(&base_path, catalog)
    };

    app.fallback(not_found)
        .layer(middleware::from_fn(logging::log_requests))
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found.")
}
