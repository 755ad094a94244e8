//! Service configuration: JSON file with environment overrides.
//!
//! Configuration failures are fatal; the service either starts fully wired
//! or not at all.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Default configuration file path, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "user_registry.conf.json";

/// Startup-time configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The config file is not valid JSON for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was attempted.
        path: String,
        /// Underlying parse failure.
        source: serde_json::Error,
    },
    /// An environment override is not valid for its field.
    #[error("invalid value in {variable}: {message}")]
    Env {
        /// Offending environment variable.
        variable: String,
        /// Why the value was rejected.
        message: String,
    },
    /// The listen address does not parse as host:port.
    #[error("invalid listen address '{addr}': {source}")]
    ListenAddr {
        /// Configured address text.
        addr: String,
        /// Underlying parse failure.
        source: std::net::AddrParseError,
    },
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Maximum connections in the database pool; half are kept idle.
    pub pool_size: u32,
    /// Poll interval of the shutdown drain loop, in milliseconds.
    pub drain_poll_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".into(),
            database_url: "postgres://localhost/user_registry".into(),
            pool_size: 10,
            drain_poll_ms: 50,
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, then apply `USER_REGISTRY_*`
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when an override carries an invalid value.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a lookup function (the environment in
    /// production, a map in tests).
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup("USER_REGISTRY_LISTEN_ADDR") {
            self.listen_addr = value;
        }
        if let Some(value) = lookup("USER_REGISTRY_DATABASE_URL") {
            self.database_url = value;
        }
        if let Some(value) = lookup("USER_REGISTRY_POOL_SIZE") {
            self.pool_size = value.parse().map_err(|_| ConfigError::Env {
                variable: "USER_REGISTRY_POOL_SIZE".into(),
                message: format!("'{value}' is not an unsigned integer"),
            })?;
        }
        if let Some(value) = lookup("USER_REGISTRY_DRAIN_POLL_MS") {
            self.drain_poll_ms = value.parse().map_err(|_| ConfigError::Env {
                variable: "USER_REGISTRY_DRAIN_POLL_MS".into(),
                message: format!("'{value}' is not an unsigned integer"),
            })?;
        }
        Ok(self)
    }

    /// Parse the configured listen address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ListenAddr`] when the text is not `host:port`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|source| ConfigError::ListenAddr {
                addr: self.listen_addr.clone(),
                source,
            })
    }

    /// Drain loop poll interval.
    pub fn drain_poll(&self) -> Duration {
        Duration::from_millis(self.drain_poll_ms)
    }
}
