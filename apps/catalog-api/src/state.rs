//! Shared application state.

use std::sync::Arc;

use catalog_core::Clock;
use catalog_db::Database;

use crate::config::AppConfig;

/// Application state shared across all handlers.
///
/// Cloned per request; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Time source for discount expiry.
    pub clock: Arc<dyn Clock>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Database, clock: Arc<dyn Clock>, config: AppConfig) -> Self {
        AppState {
            db,
            clock,
            config: Arc::new(config),
        }
    }
}
