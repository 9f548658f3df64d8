//! Shared configuration for the herald response layer.
//!
//! The host daemon owns configuration loading; this crate only describes the
//! settings the response layer consumes and the defaults it falls back to.
//! [`Config`] deserialises from any serde format with every field optional,
//! so a daemon can embed it as a table inside its own configuration file.
//!
//! ```toml
//! log_filter = "herald=debug"
//! log_format = "compact"
//! stream_buffer_bytes = 8192
//! ```

mod defaults;
mod logging;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{DEFAULT_LOG_FILTER, DEFAULT_STREAM_BUFFER_BYTES};
pub use logging::LogFormat;

/// Settings consumed by the response layer and its telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// `tracing` filter expression applied to the global subscriber.
    #[serde(default = "defaults::default_log_filter_string")]
    pub log_filter: String,
    /// Output format of the global subscriber.
    #[serde(default = "defaults::default_log_format")]
    pub log_format: LogFormat,
    /// Buffer capacity used when streaming log records.
    #[serde(default = "defaults::default_stream_buffer_bytes")]
    pub stream_buffer_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: defaults::default_log_filter_string(),
            log_format: defaults::default_log_format(),
            stream_buffer_bytes: defaults::default_stream_buffer_bytes(),
        }
    }
}

impl Config {
    /// Returns the configured log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Returns the configured log format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Returns the buffer capacity for streamed log output.
    #[must_use]
    pub const fn stream_buffer_bytes(&self) -> usize {
        self.stream_buffer_bytes
    }

    /// Checks the settings for values the response layer cannot honour.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLogFilter`] when the filter is blank and
    /// [`ConfigError::ZeroStreamBuffer`] when the buffer capacity is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        if self.stream_buffer_bytes == 0 {
            return Err(ConfigError::ZeroStreamBuffer);
        }
        Ok(())
    }
}

/// Errors raised while validating [`Config`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The log filter expression was empty.
    #[error("log filter must not be empty")]
    EmptyLogFilter,
    /// The stream buffer capacity was zero.
    #[error("stream buffer capacity must be greater than zero")]
    ZeroStreamBuffer,
}
