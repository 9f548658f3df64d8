//! Output stream abstraction shared by every response variant.
//!
//! A [`ResponseOutput`] is the only thing a response needs in order to serve
//! itself: a mutable header map, a way to commit the status line, a byte sink
//! for the body, and an optional hook for pushing buffered bytes onto the
//! wire. Body writes issued before [`ResponseOutput::write_head`] commit an
//! implicit `200 OK`, mirroring conventional HTTP server behaviour. The
//! production output bridges onto axum through [`respond`].

mod channel;
#[cfg(any(test, feature = "test-support"))]
mod recorder;
mod static_file;

use std::io::{self, Write};
use std::path::Path;

use http::{HeaderMap, Request, StatusCode};

pub use self::channel::respond;
#[cfg(any(test, feature = "test-support"))]
pub use self::recorder::RecordedResponse;

pub(crate) const OUTPUT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::output");

/// Destination a [`Response`](crate::Response) writes itself into.
pub trait ResponseOutput: Write {
    /// Headers that accompany the status line.
    ///
    /// Edits made after the head has been written do not reach the client.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Commits the status line and the current headers.
    ///
    /// Only the first call has an effect; later calls are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when the head cannot be written to the transport.
    fn write_head(&mut self, status: StatusCode) -> io::Result<()>;

    /// Forces bytes buffered below this output onto the transport.
    ///
    /// Outputs without transport-level buffering keep the default no-op.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport rejects the flush.
    fn flush_transport(&mut self) -> io::Result<()> {
        Ok(())
    }

    /// Serves a filesystem resource with static-file semantics.
    ///
    /// The default implementation answers through tower-http's `ServeFile`
    /// on a runtime built for the call, so it must not be invoked from
    /// within an async context. Outputs already bound to a runtime override
    /// it to reuse theirs.
    ///
    /// # Errors
    ///
    /// Returns an error when the head or body cannot be written, or when the
    /// runtime cannot be built. Failures to open the file are reported to the
    /// client as an HTTP error instead.
    fn serve_file(&mut self, request: &Request<()>, path: &Path) -> io::Result<()> {
        static_file::serve_standalone(self, request, path)
    }
}
