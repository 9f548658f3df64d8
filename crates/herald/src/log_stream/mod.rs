//! Streaming JSON sequence of log records (RFC 7464).
//!
//! Each record is framed as an ASCII record separator, one JSON object and a
//! line feed:
//!
//! ```text
//! \x1e{"timestamp":"2019-04-18T02:45:55Z","message":"hello","sid":"snapd","pid":"42"}\n
//! ```
//!
//! The stream reads from a [`LogSource`] until it signals end of data. A
//! source or encoding failure appends a final `{"error": ...}` frame; a write
//! failure means the peer went away and only gets logged. The source is
//! closed exactly once on every exit path.

mod journal;
mod record;
mod source;

use std::fmt;
use std::io::{self, BufWriter, Write};

use herald_config::Config;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use tracing::{debug, warn};

use crate::output::ResponseOutput;

use self::record::LogEntry;
use self::source::SourceGuard;

pub use self::journal::JournalReader;
pub use self::record::LogRecord;
pub use self::source::{LogSource, LogSourceError};

const LOG_STREAM_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::log_stream");

/// Media type of a streamed log response.
pub const JSON_SEQ_MEDIA_TYPE: &str = "application/json-seq";

/// Byte that opens every frame of the sequence.
pub const RECORD_SEPARATOR: u8 = 0x1E;

/// A json-seq response over a record source.
pub struct LogStreamResponse {
    source: Box<dyn LogSource>,
    follow: bool,
    buffer_capacity: usize,
}

/// Why the pump loop stopped before the source ran dry.
enum StreamStop {
    Read(LogSourceError),
    Encode(serde_json::Error),
    Write(io::Error),
}

impl LogStreamResponse {
    /// Streams `source`, flushing after every record when `follow` is set.
    #[must_use]
    pub fn new(source: impl LogSource + 'static, follow: bool) -> Self {
        Self {
            source: Box::new(source),
            follow,
            buffer_capacity: herald_config::DEFAULT_STREAM_BUFFER_BYTES,
        }
    }

    /// Streams `source` with the buffer capacity from `config`.
    #[must_use]
    pub fn from_config(source: impl LogSource + 'static, follow: bool, config: &Config) -> Self {
        Self::new(source, follow).with_buffer_capacity(config.stream_buffer_bytes())
    }

    /// Overrides the output buffer capacity. Zero is raised to one byte.
    #[must_use]
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(1);
        self
    }

    /// Returns whether records are flushed as they arrive.
    #[must_use]
    pub const fn follow(&self) -> bool {
        self.follow
    }

    /// Returns the output buffer capacity in bytes.
    #[must_use]
    pub const fn buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    pub(crate) fn serve<O: ResponseOutput + ?Sized>(self, out: &mut O) {
        let Self {
            source,
            follow,
            buffer_capacity,
        } = self;
        let mut guard = SourceGuard::new(source);

        out.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_SEQ_MEDIA_TYPE));
        if let Err(error) = out.write_head(StatusCode::OK) {
            warn!(target: LOG_STREAM_TARGET, %error, "cannot write response");
            guard.close();
            return;
        }

        let mut writer = BufWriter::with_capacity(buffer_capacity, out);
        let mut streamed = 0_usize;
        let stop = loop {
            let record = match guard.next_record() {
                Ok(Some(record)) => record,
                Ok(None) => break None,
                Err(error) => break Some(StreamStop::Read(error)),
            };
            let frame = match encode_frame(&record) {
                Ok(frame) => frame,
                Err(error) => break Some(StreamStop::Encode(error)),
            };
            if let Err(error) = writer.write_all(&frame) {
                break Some(StreamStop::Write(error));
            }
            streamed += 1;
            if follow {
                let pushed = writer
                    .flush()
                    .and_then(|()| writer.get_mut().flush_transport());
                if let Err(error) = pushed {
                    break Some(StreamStop::Write(error));
                }
            }
        };
        guard.close();

        let writer_failed = match stop {
            None => false,
            Some(StreamStop::Read(error)) => {
                warn!(
                    target: LOG_STREAM_TARGET,
                    %error,
                    "cannot stream response; problem reading"
                );
                write_error_frame(&mut writer, &error).is_err()
            }
            Some(StreamStop::Encode(error)) => {
                warn!(
                    target: LOG_STREAM_TARGET,
                    %error,
                    "cannot stream response; problem encoding"
                );
                write_error_frame(&mut writer, &error).is_err()
            }
            Some(StreamStop::Write(error)) => {
                warn!(
                    target: LOG_STREAM_TARGET,
                    %error,
                    "cannot stream response; problem writing"
                );
                true
            }
        };

        if writer_failed {
            // The peer is gone; drop whatever is still buffered.
            let (_, _unsent) = writer.into_parts();
        } else if let Err(error) = writer.flush() {
            warn!(target: LOG_STREAM_TARGET, %error, "cannot flush response");
        }
        debug!(target: LOG_STREAM_TARGET, records = streamed, follow, "log stream finished");
    }
}

impl fmt::Debug for LogStreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStreamResponse")
            .field("follow", &self.follow)
            .field("buffer_capacity", &self.buffer_capacity)
            .finish_non_exhaustive()
    }
}

/// Encodes one complete frame so a failed encode never leaves a dangling
/// separator on the wire.
fn encode_frame(record: &LogRecord) -> serde_json::Result<Vec<u8>> {
    let mut frame = vec![RECORD_SEPARATOR];
    serde_json::to_writer(&mut frame, &LogEntry::from(record))?;
    frame.push(b'\n');
    Ok(frame)
}

fn write_error_frame<W: Write>(writer: &mut W, error: &dyn fmt::Display) -> io::Result<()> {
    let mut frame = vec![RECORD_SEPARATOR];
    serde_json::to_writer(
        &mut frame,
        &serde_json::json!({ "error": error.to_string() }),
    )?;
    frame.push(b'\n');
    writer.write_all(&frame).inspect_err(|write_error| {
        warn!(
            target: LOG_STREAM_TARGET,
            error = %write_error,
            "cannot write error frame"
        );
    })
}
