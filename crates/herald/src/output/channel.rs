//! Bridges blocking response serving onto an axum response body.
//!
//! A [`Response`] serves itself through blocking writes, so [`respond`] runs
//! it on tokio's blocking pool against a [`ChannelOutput`]. The committed head
//! travels back over a oneshot channel and body chunks over a bounded mpsc
//! channel that backs the axum [`Body`]. When the client goes away hyper drops
//! the body stream, and the next chunk the output tries to send fails with
//! [`io::ErrorKind::BrokenPipe`].

use std::io::{self, Write};
use std::mem;
use std::path::Path;

use axum::body::Body;
use bytes::Bytes;
use http::{HeaderMap, Request, Response as HttpResponse, StatusCode};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use super::{OUTPUT_TARGET, ResponseOutput, static_file};
use crate::Response;

/// Bytes collected before a chunk is handed to the body without a flush.
pub(crate) const CHUNK_SIZE: usize = 8 * 1024;

/// Chunks that may wait in the body channel before writers block.
const BODY_CHANNEL_DEPTH: usize = 16;

type Head = (StatusCode, HeaderMap);
type Chunk = io::Result<Bytes>;

/// Serves `response` for `request` and returns the resulting axum response.
///
/// The status and headers are available as soon as the response commits its
/// head; the body then streams while the response keeps writing, so followed
/// log streams reach the client record by record.
///
/// Must be awaited from within a tokio runtime.
pub async fn respond(response: Response, request: Request<()>) -> HttpResponse<Body> {
    let (head_tx, head_rx) = oneshot::channel();
    let (body_tx, body_rx) = mpsc::channel(BODY_CHANNEL_DEPTH);
    let runtime = Handle::current();
    let serving = task::spawn_blocking(move || {
        let mut out = ChannelOutput::new(head_tx, body_tx, runtime);
        response.serve(&mut out, &request);
        if let Err(error) = out.finish() {
            debug!(target: OUTPUT_TARGET, %error, "response body abandoned");
        }
    });

    if let Ok((status, headers)) = head_rx.await {
        let mut built = HttpResponse::new(Body::from_stream(ReceiverStream::new(body_rx)));
        *built.status_mut() = status;
        *built.headers_mut() = headers;
        return built;
    }
    if let Err(error) = serving.await {
        warn!(target: OUTPUT_TARGET, %error, "response serving task failed");
    }
    let mut failed = HttpResponse::new(Body::empty());
    *failed.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    failed
}

/// [`ResponseOutput`] that feeds an axum body from a blocking thread.
///
/// Sends block when the body channel is full, so the output must live on a
/// thread outside the async executor, such as one from
/// [`task::spawn_blocking`].
#[derive(Debug)]
pub(crate) struct ChannelOutput {
    headers: HeaderMap,
    head: Option<oneshot::Sender<Head>>,
    body: mpsc::Sender<Chunk>,
    pending: Vec<u8>,
    runtime: Handle,
}

impl ChannelOutput {
    pub(crate) fn new(
        head: oneshot::Sender<Head>,
        body: mpsc::Sender<Chunk>,
        runtime: Handle,
    ) -> Self {
        Self {
            headers: HeaderMap::new(),
            head: Some(head),
            body,
            pending: Vec::new(),
            runtime,
        }
    }

    /// Commits an empty `200 OK` if nothing was written and sends the
    /// remaining bytes.
    ///
    /// Dropping the output afterwards ends the body stream.
    pub(crate) fn finish(mut self) -> io::Result<()> {
        self.write_head(StatusCode::OK)?;
        self.send_pending()
    }

    fn send_pending(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let chunk = Bytes::from(mem::take(&mut self.pending));
        self.body
            .blocking_send(Ok(chunk))
            .map_err(|_| client_gone())
    }
}

fn client_gone() -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, "client went away")
}

impl Write for ChannelOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_head(StatusCode::OK)?;
        self.pending.extend_from_slice(buf);
        if self.pending.len() >= CHUNK_SIZE {
            self.send_pending()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.send_pending()
    }
}

impl ResponseOutput for ChannelOutput {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        let Some(head) = self.head.take() else {
            debug!(target: OUTPUT_TARGET, status = status.as_u16(), "superfluous write_head call");
            return Ok(());
        };
        let committed = head.send((status, mem::take(&mut self.headers)));
        committed.map_err(|_| client_gone())
    }

    fn flush_transport(&mut self) -> io::Result<()> {
        self.send_pending()
    }

    fn serve_file(&mut self, request: &Request<()>, path: &Path) -> io::Result<()> {
        let runtime = self.runtime.clone();
        static_file::serve(self, request, path, &runtime)
    }
}
