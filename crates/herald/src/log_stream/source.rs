//! Sequential record sources and their release guarantees.

use std::io;

use thiserror::Error;
use tracing::warn;

use super::{LOG_STREAM_TARGET, LogRecord};

/// A pull-based reader of log records.
///
/// The stream owns its source for the duration of one response and closes
/// it exactly once when the response finishes, however it finishes.
pub trait LogSource: Send {
    /// Reads the next record, blocking until one is available.
    ///
    /// Returns `Ok(None)` once the source is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`LogSourceError`] when the source cannot produce a record.
    fn next_record(&mut self) -> Result<Option<LogRecord>, LogSourceError>;

    /// Releases the resources behind the source.
    ///
    /// # Errors
    ///
    /// Returns [`LogSourceError`] when the release itself fails.
    fn close(&mut self) -> Result<(), LogSourceError>;
}

/// Failures reported by a [`LogSource`].
#[derive(Debug, Error)]
pub enum LogSourceError {
    /// Reading from the underlying stream failed.
    #[error("cannot read log source: {0}")]
    Io(#[from] io::Error),
    /// A record could not be decoded.
    #[error("cannot decode log record: {0}")]
    Decode(#[from] serde_json::Error),
    /// Any other source-specific failure.
    #[error("{message}")]
    Other {
        /// Description of the failure.
        message: String,
    },
}

impl LogSourceError {
    /// Creates a source-specific failure.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }
}

/// Holds a source and closes it exactly once.
///
/// Closing happens on [`SourceGuard::close`] or, failing that, on drop, so
/// the source is released even when serving unwinds.
pub(super) struct SourceGuard {
    source: Option<Box<dyn LogSource>>,
}

impl SourceGuard {
    pub(super) fn new(source: Box<dyn LogSource>) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub(super) fn next_record(&mut self) -> Result<Option<LogRecord>, LogSourceError> {
        match self.source.as_mut() {
            Some(source) => source.next_record(),
            None => Ok(None),
        }
    }

    pub(super) fn close(&mut self) {
        let Some(mut source) = self.source.take() else {
            return;
        };
        if let Err(error) = source.close() {
            warn!(target: LOG_STREAM_TARGET, %error, "cannot close log source");
        }
    }
}

impl Drop for SourceGuard {
    fn drop(&mut self) {
        self.close();
    }
}
