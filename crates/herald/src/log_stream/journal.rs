//! Adapter decoding journal export objects into [`LogRecord`]s.
//!
//! `journalctl -o json` prints one JSON object per entry. Field values are
//! usually strings, but binary-safe fields such as `MESSAGE` may arrive as an
//! array of bytes, and the realtime timestamp is a decimal count of
//! microseconds since the Unix epoch.

use std::io::Read;

use serde::Deserialize;
use serde_json::de::IoRead;
use serde_json::{StreamDeserializer, Value};
use time::OffsetDateTime;

use super::{LogRecord, LogSource, LogSourceError};

/// Fields of a journal entry the stream cares about.
#[derive(Debug, Default, Deserialize)]
struct JournalEntry {
    #[serde(rename = "__REALTIME_TIMESTAMP", default)]
    realtime_timestamp: Option<Value>,
    #[serde(rename = "MESSAGE", default)]
    message: Option<Value>,
    #[serde(rename = "SYSLOG_IDENTIFIER", default)]
    syslog_identifier: Option<Value>,
    #[serde(rename = "_PID", default)]
    pid: Option<Value>,
}

impl JournalEntry {
    fn into_record(self) -> LogRecord {
        LogRecord {
            timestamp: self
                .realtime_timestamp
                .as_ref()
                .and_then(timestamp_from_micros)
                .unwrap_or(OffsetDateTime::UNIX_EPOCH),
            message: text_field(self.message),
            source_identifier: text_field(self.syslog_identifier),
            process_id: text_field(self.pid),
        }
    }
}

/// Reads consecutive journal objects from a byte stream.
///
/// Wrap unbuffered readers such as pipes in a `BufReader` first; the decoder
/// reads byte by byte.
pub struct JournalReader<R: Read> {
    entries: Option<StreamDeserializer<'static, IoRead<R>, JournalEntry>>,
}

impl<R: Read> JournalReader<R> {
    /// Starts decoding `reader`.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            entries: Some(serde_json::Deserializer::from_reader(reader).into_iter()),
        }
    }
}

impl<R: Read + Send> LogSource for JournalReader<R> {
    fn next_record(&mut self) -> Result<Option<LogRecord>, LogSourceError> {
        let Some(entries) = self.entries.as_mut() else {
            return Ok(None);
        };
        match entries.next() {
            None => Ok(None),
            Some(Ok(entry)) => Ok(Some(entry.into_record())),
            Some(Err(error)) if error.is_io() => Err(LogSourceError::Io(error.into())),
            Some(Err(error)) => Err(LogSourceError::Decode(error)),
        }
    }

    fn close(&mut self) -> Result<(), LogSourceError> {
        self.entries = None;
        Ok(())
    }
}

fn timestamp_from_micros(value: &Value) -> Option<OffsetDateTime> {
    let micros = match value {
        Value::String(text) => text.trim().parse::<i64>().ok()?,
        Value::Number(number) => number.as_i64()?,
        _ => return None,
    };
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(micros) * 1_000).ok()
}

fn text_field(value: Option<Value>) -> String {
    match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Array(items)) => {
            let bytes: Vec<u8> = items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|byte| u8::try_from(byte).ok())
                .collect();
            String::from_utf8_lossy(&bytes).into_owned()
        }
        Some(_) | None => String::new(),
    }
}
