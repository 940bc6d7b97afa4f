//! # Catalog API
//!
//! HTTP server for the product catalog.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Catalog API Server                               │
//! │                                                                         │
//! │  Client ───► HTTP (8000) ───► axum Router ───► SQLite (WAL)            │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                              catalog-core                               │
//! │                          (discount selection)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use catalog_api::logging::init_tracing;
use catalog_api::{build_router, AppConfig, AppState};
use catalog_core::SystemClock;
use catalog_db::{Database, DbConfig};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Catalog API server...");

    let config = AppConfig::load(None)?;
    info!(
        addr = %config.server.bind_address(),
        base_path = %config.server.base_path,
        db_path = %config.database.path.display(),
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database.path).max_connections(config.database.max_connections),
    )
    .await?;
    info!("Database ready");

    let addr = config.server.bind_address();
    let state = AppState::new(db.clone(), Arc::new(SystemClock), config);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(?e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
