//! Response protocol core for a management daemon's HTTP API.
//!
//! Handlers finish with a [`Response`], a closed set of wire
//! representations that each know how to write themselves to a
//! [`ResponseOutput`]:
//!
//! - `sync`, `async` and `error` results share one JSON [`Envelope`] with
//!   flattened [`Meta`] fields;
//! - log records stream as an RFC 7464 JSON text sequence, optionally
//!   flushed record by record for live following;
//! - signed documents are served individually or as a bundle with a count
//!   header;
//! - files are served as attachments with range and conditional-request
//!   support.
//!
//! Serving never fails from the caller's point of view. Encoding failures
//! before the head is written degrade to an empty `500`; failures after that
//! truncate the body or append an in-band error frame, and are reported
//! through `tracing` under per-module targets. [`telemetry::initialise`]
//! installs a subscriber configured by [`herald_config::Config`].
//!
//! Inside an axum handler, [`respond`] serves a response on tokio's blocking
//! pool and streams the body back as it is written:
//!
//! ```
//! use herald::{respond, sync_response};
//! use http::{Request, StatusCode};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let request = Request::get("/v2/snaps").body(()).expect("request");
//! let snaps = sync_response(serde_json::json!(["core", "snapd"]), None);
//! let response = respond(snaps, request).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! # }
//! ```
//!
//! Enable the `test-support` feature to get `RecordedResponse`, an
//! in-memory output for asserting on what handler code serves.

mod assertions;
mod envelope;
mod file;
mod log_stream;
mod output;
mod response;
mod taxonomy;
pub mod telemetry;

pub use assertions::{
    ASSERTION_BUNDLE_MEDIA_TYPE, ASSERTION_MEDIA_TYPE, ASSERTIONS_COUNT_HEADER, AssertionBundle,
    DocumentEncodeError, DocumentEncoder, RawDocument, SignedDocument,
};
pub use envelope::{
    EncodeError, EncodeResult, Envelope, JSON_MEDIA_TYPE, Meta, Paging, ResponseType, WireEnvelope,
};
pub use file::FileResponse;
pub use log_stream::{
    JSON_SEQ_MEDIA_TYPE, JournalReader, LogRecord, LogSource, LogSourceError, LogStreamResponse,
    RECORD_SEPARATOR,
};
#[cfg(any(test, feature = "test-support"))]
pub use output::RecordedResponse;
pub use output::{ResponseOutput, respond};
pub use response::{Outcome, Response, async_response, sync_response};
pub use taxonomy::responders;
pub use taxonomy::{ErrorKind, ErrorResult};
pub use telemetry::{TelemetryError, TelemetryHandle};

#[cfg(test)]
mod tests;
