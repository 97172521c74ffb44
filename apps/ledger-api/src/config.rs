//! API server configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! ```text
//! built-in defaults  →  ./ledger.toml (optional)  →  LEDGER_* environment
//! ```
//!
//! e.g. `LEDGER_PORT=9000 LEDGER_DATABASE_PATH=/var/lib/ledger.db ledger-api`

use std::net::SocketAddr;
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{ConfigBuilder, Environment, File};
use ledger_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Ledger API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// Milliseconds a writer waits for the SQLite write lock
    pub busy_timeout_ms: u64,

    /// Default tracing filter when `RUST_LOG` is not set
    pub log_level: String,

    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl ApiConfig {
    /// Loads configuration from defaults, `ledger.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("ledger").required(false))
            .add_source(Environment::with_prefix("LEDGER").try_parsing(true));

        Self::from_builder(builder)
    }

    /// Builder pre-filled with the built-in defaults.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(::config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("database_path", "./ledger.db")?
            .set_default("max_connections", 5_i64)?
            .set_default("busy_timeout_ms", 5000_i64)?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?)
    }

    /// Builds and validates the configuration from `builder`.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ApiConfig = builder.build()?.try_deserialize()?;

        if config.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if config.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("host".to_string()))
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .busy_timeout(Duration::from_millis(self.busy_timeout_ms))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
