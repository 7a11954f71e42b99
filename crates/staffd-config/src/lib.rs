//! Shared configuration for the staffd request server.
//!
//! Values are layered by [`ortho_config`]: built-in defaults, then an optional
//! TOML file passed via `--config-path`, then `STAFFD_*` environment variables
//! and finally command-line flags. The resolved [`Config`] is consumed by the
//! daemon at bootstrap and never mutated afterwards.

mod defaults;
mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_MAX_REQUEST_BYTES, DEFAULT_PORT,
    DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, default_host, default_log_filter,
    default_log_filter_string, default_log_format, default_max_request_bytes, default_port,
    default_queue_capacity, default_workers,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "STAFFD")]
pub struct Config {
    /// Address the listener binds to.
    #[serde(default = "default_host")]
    #[ortho_config(default = default_host())]
    pub host: String,
    /// TCP port the listener binds to.
    #[serde(default = "default_port")]
    #[ortho_config(default = default_port())]
    pub port: u16,
    /// Number of worker threads serving sessions.
    #[serde(default = "default_workers")]
    #[ortho_config(default = default_workers())]
    pub workers: usize,
    /// Accepted connections allowed to wait for a free worker.
    #[serde(default = "default_queue_capacity")]
    #[ortho_config(default = default_queue_capacity())]
    pub queue_capacity: usize,
    /// Longest request line accepted, in bytes, excluding the newline delimiter.
    #[serde(default = "default_max_request_bytes")]
    #[ortho_config(default = default_max_request_bytes())]
    pub max_request_bytes: usize,
    /// `tracing` filter expression.
    #[serde(default = "default_log_filter_string")]
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for log events.
    #[serde(default = "default_log_format")]
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Host and port pair suitable for `ToSocketAddrs`.
    #[must_use]
    pub fn listen_address(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }

    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Configured log output format.
    #[must_use]
    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Rejects values the server cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositive`] naming the first zero-valued
    /// sizing field, or [`ConfigError::EmptyHost`] when no bind host is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        let sizes = [
            ("workers", self.workers),
            ("queue_capacity", self.queue_capacity),
            ("max_request_bytes", self.max_request_bytes),
        ];
        match sizes.iter().find(|(_, value)| *value == 0) {
            Some((field, _)) => Err(ConfigError::NonPositive { field }),
            None => Ok(()),
        }
    }
}

/// Semantic errors found in an otherwise well-formed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A sizing field was zero.
    #[error("configuration field '{field}' must be greater than zero")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The bind host was blank.
    #[error("configuration field 'host' must not be empty")]
    EmptyHost,
}
