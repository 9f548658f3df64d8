//! Test doubles shared by the crate-level suites.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use time::OffsetDateTime;

use crate::{LogRecord, LogSource, LogSourceError};

/// Replays a fixed list of records, optionally followed by a failure.
pub struct ScriptedSource {
    records: VecDeque<LogRecord>,
    failure: Option<String>,
    closes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    /// Builds a source yielding `count` records, then ending cleanly.
    pub fn with_records(count: usize) -> Self {
        let records = (0..count)
            .map(|index| {
                let offset = i64::try_from(index).unwrap_or_default();
                let timestamp = OffsetDateTime::from_unix_timestamp(1_555_555_555 + offset)
                    .unwrap_or(OffsetDateTime::UNIX_EPOCH);
                LogRecord::new(timestamp, format!("record {index}"), "snapd", "42")
            })
            .collect();
        Self {
            records,
            failure: None,
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Makes the source fail with `message` once the records run out.
    pub fn failing_with(mut self, message: &str) -> Self {
        self.failure = Some(message.to_owned());
        self
    }

    /// Returns a counter of `close` calls that outlives the source.
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }
}

impl LogSource for ScriptedSource {
    fn next_record(&mut self) -> Result<Option<LogRecord>, LogSourceError> {
        if let Some(record) = self.records.pop_front() {
            return Ok(Some(record));
        }
        match self.failure.take() {
            Some(message) => Err(LogSourceError::other(message)),
            None => Ok(None),
        }
    }

    fn close(&mut self) -> Result<(), LogSourceError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
