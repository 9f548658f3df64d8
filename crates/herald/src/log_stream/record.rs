//! Log records and their json-seq wire form.

use serde::ser::Error as _;
use serde::{Serialize, Serializer};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One entry read from a log source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// When the entry was logged.
    pub timestamp: OffsetDateTime,
    /// Log message text.
    pub message: String,
    /// Syslog identifier of the emitting process.
    pub source_identifier: String,
    /// Process identifier of the emitting process.
    pub process_id: String,
}

impl LogRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(
        timestamp: OffsetDateTime,
        message: impl Into<String>,
        source_identifier: impl Into<String>,
        process_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            message: message.into(),
            source_identifier: source_identifier.into(),
            process_id: process_id.into(),
        }
    }
}

/// Object written after each record separator.
#[derive(Debug, Serialize)]
pub(super) struct LogEntry<'a> {
    #[serde(serialize_with = "rfc3339")]
    timestamp: OffsetDateTime,
    message: &'a str,
    sid: &'a str,
    pid: &'a str,
}

impl<'a> From<&'a LogRecord> for LogEntry<'a> {
    fn from(record: &'a LogRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            message: &record.message,
            sid: &record.source_identifier,
            pid: &record.process_id,
        }
    }
}

fn rfc3339<S: Serializer>(timestamp: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    let text = timestamp.format(&Rfc3339).map_err(S::Error::custom)?;
    serializer.serialize_str(&text)
}
