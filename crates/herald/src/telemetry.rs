//! Global `tracing` subscriber for processes embedding the response layer.
//!
//! Every module logs under its own target (`herald::envelope`,
//! `herald::log_stream` and so on), so a filter such as
//! `herald::log_stream=debug,info` narrows output to stream termination
//! details without drowning in the rest.

use std::io::{self, IsTerminal};

use herald_config::{Config, ConfigError};
use once_cell::sync::OnceCell;
use tracing::Subscriber;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::UtcTime;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors raised while installing telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configuration cannot be honoured.
    #[error("invalid telemetry configuration: {0}")]
    Config(#[from] ConfigError),
    /// The log filter expression did not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber was installed first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls return a fresh [`TelemetryHandle`] without touching global
/// state, whatever configuration they pass.
///
/// ```rust
/// use herald::telemetry;
/// use herald_config::Config;
///
/// # fn main() -> Result<(), herald::telemetry::TelemetryError> {
/// let config = Config::default();
/// let first = telemetry::initialise(&config)?;
/// let second = telemetry::initialise(&config)?;
/// drop((first, second));
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns [`TelemetryError`] when the configuration is invalid, the filter
/// does not parse, or a foreign subscriber already holds the global slot.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            let subscriber = subscriber_for(config)?;
            tracing::subscriber::set_global_default(subscriber)
                .map_err(TelemetryError::Subscriber)
        })
        .map(|_| TelemetryHandle)
}

/// Builds the subscriber `config` describes without installing it.
///
/// # Errors
///
/// Returns [`TelemetryError::Config`] for invalid settings and
/// [`TelemetryError::Filter`] when the filter expression does not parse.
pub fn subscriber_for(
    config: &Config,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    config.validate()?;
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(UtcTime::rfc_3339());

    if config.log_format().is_structured() {
        Ok(Box::new(builder.json().flatten_event(true).finish()))
    } else {
        Ok(Box::new(builder.compact().finish()))
    }
}

#[cfg(test)]
mod tests {
    use herald_config::LogFormat;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(LogFormat::Json)]
    #[case(LogFormat::Compact)]
    fn builds_subscribers_for_each_format(#[case] log_format: LogFormat) {
        let config = Config {
            log_filter: "herald=debug".to_owned(),
            log_format,
            ..Config::default()
        };
        let subscriber = subscriber_for(&config).expect("subscriber");
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(target: "herald::telemetry", "subscriber active");
        });
    }

    #[test]
    fn rejects_unparseable_filters() {
        let config = Config {
            log_filter: "herald=[".to_owned(),
            ..Config::default()
        };
        let error = subscriber_for(&config).err().expect("filter must fail");
        assert!(matches!(error, TelemetryError::Filter(_)), "got {error:?}");
    }

    #[test]
    fn rejects_invalid_configuration() {
        let config = Config {
            stream_buffer_bytes: 0,
            ..Config::default()
        };
        let error = subscriber_for(&config).err().expect("config must fail");
        assert!(matches!(
            error,
            TelemetryError::Config(ConfigError::ZeroStreamBuffer)
        ));
    }

    #[test]
    fn initialise_is_idempotent() {
        let config = Config::default();
        initialise(&config).expect("first initialisation");
        initialise(&config).expect("second initialisation");
    }
}
