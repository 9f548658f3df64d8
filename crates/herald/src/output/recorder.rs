//! In-memory output used to observe served responses.

use std::io::{self, Write};

use http::{HeaderMap, StatusCode};

use super::ResponseOutput;

/// Records everything a response writes, for assertions in tests.
///
/// Headers are snapshotted when the head is committed so late header edits
/// are visible as missing, just as they would be on a real connection.
#[derive(Debug, Default)]
pub struct RecordedResponse {
    status: Option<StatusCode>,
    pending: HeaderMap,
    committed: Option<HeaderMap>,
    body: Vec<u8>,
    transport_flushes: usize,
    disconnect_after: Option<usize>,
}

impl RecordedResponse {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates a peer that disconnects once `limit` body bytes arrived.
    ///
    /// Writes past the limit fail with [`io::ErrorKind::BrokenPipe`].
    #[must_use]
    pub const fn disconnect_after(mut self, limit: usize) -> Self {
        self.disconnect_after = Some(limit);
        self
    }

    /// Returns the committed status, if the head was written.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Returns the committed headers, or the pending ones before commit.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.committed.as_ref().unwrap_or(&self.pending)
    }

    /// Returns a committed header as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    }

    /// Returns the raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body decoded as UTF-8, replacing invalid sequences.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Returns how many transport flushes the response requested.
    #[must_use]
    pub const fn transport_flushes(&self) -> usize {
        self.transport_flushes
    }
}

impl Write for RecordedResponse {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK)?;
        if let Some(limit) = self.disconnect_after {
            let remaining = limit.saturating_sub(self.body.len());
            if remaining == 0 && !buf.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "peer disconnected",
                ));
            }
            let accepted = buf.len().min(remaining);
            self.body
                .extend_from_slice(buf.get(..accepted).unwrap_or_default());
            return Ok(accepted);
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseOutput for RecordedResponse {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.pending
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        if self.status.is_none() {
            self.status = Some(status);
            self.committed = Some(self.pending.clone());
        }
        Ok(())
    }

    fn flush_transport(&mut self) -> io::Result<()> {
        self.transport_flushes += 1;
        Ok(())
    }
}
