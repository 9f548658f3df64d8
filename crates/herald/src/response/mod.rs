//! The closed set of responses a handler can hand back.
//!
//! Handlers finish with a [`Response`] and [`respond`](crate::respond) calls
//! [`Response::serve`] exactly once. Ordinary values become `sync` envelopes
//! through [`sync_response`], which also accepts errors and ready-made
//! responses so a handler can return all three through one path:
//!
//! ```
//! use herald::{Outcome, Response, responders::NOT_FOUND, sync_response};
//!
//! fn lookup(name: &str) -> Result<Outcome, std::io::Error> {
//!     if name.is_empty() {
//!         return Ok(NOT_FOUND.respond("no name given").into());
//!     }
//!     Ok(Outcome::value(vec![name.to_owned()]))
//! }
//!
//! let response: Response = sync_response(lookup("core"), None);
//! # drop(response);
//! ```


use std::fmt;
use std::path::PathBuf;

use http::{Request, StatusCode};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::assertions::{AssertionBundle, SignedDocument};
use crate::envelope::{EncodeResult, Envelope, Meta};
use crate::file::FileResponse;
use crate::log_stream::{LogSource, LogStreamResponse};
use crate::output::ResponseOutput;
use crate::taxonomy::ErrorResult;
use crate::taxonomy::responders::INTERNAL_ERROR;

/// Every representation the API can put on the wire.
#[derive(Debug)]
pub enum Response {
    /// `200` envelope around an immediate result.
    Sync(Envelope),
    /// `202` envelope describing a background operation.
    Async(Envelope),
    /// Error envelope with a status from the error taxonomy.
    Error(Envelope),
    /// File download.
    File(FileResponse),
    /// Streaming JSON sequence of log records.
    StreamingLog(LogStreamResponse),
    /// One or more signed documents.
    AssertionBundle(AssertionBundle),
}

impl Response {
    /// Builds an error envelope with an explicit status and result.
    ///
    /// Use this when the error needs a specific [`ErrorKind`]; the generic
    /// responders cover the common cases.
    ///
    /// [`ErrorKind`]: crate::ErrorKind
    #[must_use]
    pub fn error(status: StatusCode, result: ErrorResult) -> Self {
        Self::Error(Envelope::error(status, result))
    }

    /// Builds a download of the file at `path`.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(FileResponse::new(path))
    }

    /// Builds a json-seq stream over `source`.
    ///
    /// With `follow` set, every record is pushed to the client as soon as it
    /// is read.
    #[must_use]
    pub fn log_stream(source: impl LogSource + 'static, follow: bool) -> Self {
        Self::StreamingLog(LogStreamResponse::new(source, follow))
    }

    /// Builds a signed-document response.
    #[must_use]
    pub fn assertions(documents: Vec<Box<dyn SignedDocument>>, bundle: bool) -> Self {
        Self::AssertionBundle(AssertionBundle::new(documents, bundle))
    }

    /// Returns the envelope behind `sync`, `async` and `error` responses.
    #[must_use]
    pub const fn envelope(&self) -> Option<&Envelope> {
        match self {
            Self::Sync(envelope) | Self::Async(envelope) | Self::Error(envelope) => Some(envelope),
            Self::File(_) | Self::StreamingLog(_) | Self::AssertionBundle(_) => None,
        }
    }

    /// Writes status line, headers and body to `out`.
    ///
    /// Failures are logged and never surface to the caller: once a response
    /// starts writing, the only remaining recourse is a truncated body.
    pub fn serve<O: ResponseOutput + ?Sized>(self, out: &mut O, request: &Request<()>) {
        match self {
            Self::Sync(envelope) | Self::Async(envelope) | Self::Error(envelope) => {
                envelope.serve(out);
            }
            Self::File(file) => file.serve(out, request),
            Self::StreamingLog(stream) => stream.serve(out),
            Self::AssertionBundle(bundle) => bundle.serve(out),
        }
    }
}

/// Whatever a handler produced, before it becomes a [`Response`].
pub enum Outcome {
    /// A value to wrap in a `sync` envelope.
    Value(Box<dyn EncodeResult>),
    /// A failure, reported as a generic internal error.
    Failed(String),
    /// A finished response, passed through untouched.
    Ready(Response),
}

impl Outcome {
    /// Wraps a serializable value.
    #[must_use]
    pub fn value<T: Serialize + Send + 'static>(value: T) -> Self {
        Self::Value(Box::new(value))
    }

    /// Records a failure by its description.
    #[must_use]
    pub fn failed(error: impl fmt::Display) -> Self {
        Self::Failed(error.to_string())
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(_) => f.write_str("Value(..)"),
            Self::Failed(message) => f.debug_tuple("Failed").field(message).finish(),
            Self::Ready(response) => f.debug_tuple("Ready").field(response).finish(),
        }
    }
}

impl From<Response> for Outcome {
    fn from(response: Response) -> Self {
        Self::Ready(response)
    }
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Value(Box::new(value))
    }
}

impl<T, E> From<Result<T, E>> for Outcome
where
    T: Into<Self>,
    E: fmt::Display,
{
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(error) => Self::failed(error),
        }
    }
}

/// Builds a `sync` response from a handler outcome.
///
/// Values are wrapped in a `200` envelope. Failures become a `500` with the
/// message `internal error: <description>` and no kind. Ready responses are
/// returned unchanged.
#[must_use]
pub fn sync_response(outcome: impl Into<Outcome>, meta: Option<Meta>) -> Response {
    match outcome.into() {
        Outcome::Value(result) => Response::Sync(Envelope::sync(result, meta)),
        Outcome::Failed(message) => {
            INTERNAL_ERROR.respond(format_args!("internal error: {message}"))
        }
        Outcome::Ready(response) => response,
    }
}

/// Builds an `async` response for a background operation.
///
/// The operation map should carry a `resource` locator; when it does, the
/// served response points `Location` at it.
#[must_use]
pub fn async_response(operation: Map<String, Value>, meta: Option<Meta>) -> Response {
    Response::Async(Envelope::asynchronous(operation, meta))
}
