//! # Configuration
//!
//! Server settings with built-in defaults, overridable through `ITEMS_*`
//! environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use axum::http::HeaderValue;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 120;

/// Where and how verbosely the service writes its logs
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Directory holding the log file, created on startup if missing
    pub dir: PathBuf,
    /// Log file name inside `dir`, opened in append mode
    pub file: String,
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("logs"),
            file: "app.log".to_string(),
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// How long in-flight requests get to finish after a shutdown signal
    pub shutdown_timeout: Duration,
    pub cors_origin: Option<String>,
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            shutdown_timeout: Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS),
            cors_origin: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("ITEMS_PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("ITEMS_PORT must be a port number, got {:?}", port))?;
        }
        if let Some(secs) = lookup("ITEMS_SHUTDOWN_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().with_context(|| {
                format!("ITEMS_SHUTDOWN_TIMEOUT_SECS must be whole seconds, got {:?}", secs)
            })?;
            config.shutdown_timeout = Duration::from_secs(secs);
        }
        if let Some(origin) = lookup("ITEMS_CORS_ORIGIN").filter(|o| !o.trim().is_empty()) {
            config.cors_origin = Some(origin.trim().to_string());
        }
        if let Some(dir) = lookup("ITEMS_LOG_DIR") {
            config.logging.dir = PathBuf::from(dir);
        }
        if let Some(file) = lookup("ITEMS_LOG_FILE") {
            config.logging.file = file;
        }
        if let Some(level) = lookup("ITEMS_LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Address the listener binds to: all interfaces on the configured port
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// The configured CORS origin as a header value, if any
    pub fn cors_header(&self) -> Result<Option<HeaderValue>> {
        self.cors_origin
            .as_deref()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .map_err(|e| anyhow!("invalid ITEMS_CORS_ORIGIN {:?}: {}", origin, e))
            })
            .transpose()
    }
}
