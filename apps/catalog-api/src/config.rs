//! # Server Configuration
//!
//! Configuration management for the catalog API.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CATALOG_PORT=9000                                                  │
//! │     CATALOG_DB_PATH=/var/lib/catalog/catalog.db                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $CATALOG_CONFIG, or the platform config dir:                       │
//! │     ~/.config/catalog-api/catalog.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8000
//! base_path = "/api"
//!
//! [database]
//! path = "catalog.db"
//! max_connections = 5
//!
//! [pagination]
//! enabled = true
//! page_size = 10
//! max_page_size = 100
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces).
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Prefix for every catalog route. `/health` is always unprefixed.
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_base_path() -> String {
    "/api".to_string()
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            base_path: default_base_path(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Base path without a trailing slash; empty means "mounted at root".
    pub fn normalized_base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }
}

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file; created on first start.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("catalog.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Pagination Settings
// =============================================================================

/// Page-number pagination for product listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationSettings {
    /// When false, listings return a bare JSON array.
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound for the `page_size` query parameter.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_page_size() -> usize {
    10
}

fn default_max_page_size() -> usize {
    100
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            enabled: true,
            page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$CATALOG_CONFIG`, or the platform default)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("CATALOG_CONFIG").ok().map(PathBuf::from))
            .or_else(Self::default_config_path);

        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading config from file");
                config = Self::from_toml(&std::fs::read_to_string(&path)?)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document; missing sections fall back to defaults.
    pub fn from_toml(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let base = &self.server.base_path;
        if !base.is_empty() && !base.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "base_path must start with '/', got: {}",
                base
            )));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "max_connections must be greater than 0".into(),
            ));
        }

        if self.pagination.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be greater than 0".into(),
            ));
        }

        if self.pagination.max_page_size < self.pagination.page_size {
            return Err(ConfigError::Invalid(
                "max_page_size must be at least page_size".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from `lookup` (the process environment in
    /// production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("CATALOG_BIND_ADDR") {
            self.server.bind_addr = addr;
        }

        if let Some(port) = lookup("CATALOG_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid CATALOG_PORT"),
            }
        }

        if let Some(base) = lookup("CATALOG_BASE_PATH") {
            self.server.base_path = base;
        }

        if let Some(path) = lookup("CATALOG_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(max) = lookup("CATALOG_DB_MAX_CONNECTIONS") {
            if let Ok(m) = max.parse::<u32>() {
                self.database.max_connections = m;
            }
        }

        if let Some(enabled) = lookup("CATALOG_PAGINATION") {
            match enabled.to_lowercase().as_str() {
                "1" | "true" | "on" => self.pagination.enabled = true,
                "0" | "false" | "off" => self.pagination.enabled = false,
                _ => warn!(value = %enabled, "Unknown CATALOG_PAGINATION value"),
            }
        }

        if let Some(size) = lookup("CATALOG_PAGE_SIZE") {
            if let Ok(s) = size.parse::<usize>() {
                self.pagination.page_size = s;
            }
        }

        if let Some(size) = lookup("CATALOG_MAX_PAGE_SIZE") {
            if let Ok(s) = size.parse::<usize>() {
                self.pagination.max_page_size = s;
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "catalog", "catalog-api")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }
}
