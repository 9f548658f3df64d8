//! Static-file serving behind [`ResponseOutput::serve_file`].
//!
//! Requests are answered by tower-http's [`ServeFile`], which owns
//! `Last-Modified` and `If-Modified-Since`, byte ranges and media type
//! inference. The served head is merged into the output's headers and the
//! body is pumped into the output frame by frame.

use std::io::{self, Write};
use std::path::Path;

use http::header::CONTENT_TYPE;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::runtime::{self, Handle};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::ResponseOutput;

/// Serves `path` into `out`, driving tower-http's futures on `runtime`.
///
/// Must not be called from within an async context. Directories are answered
/// with `404 Not Found`. A `Content-Type` the caller already set is kept.
pub(super) fn serve<O: ResponseOutput + ?Sized>(
    out: &mut O,
    request: &Request<()>,
    path: &Path,
    runtime: &Handle,
) -> io::Result<()> {
    if path.is_dir() {
        return out.write_head(StatusCode::NOT_FOUND);
    }

    let Ok(served) = runtime.block_on(ServeFile::new(path).oneshot(file_request(request)));
    let (parts, body) = served.into_parts();
    let headers = out.headers_mut();
    for (name, value) in &parts.headers {
        if name == CONTENT_TYPE && headers.contains_key(CONTENT_TYPE) {
            continue;
        }
        headers.insert(name.clone(), value.clone());
    }
    out.write_head(parts.status)?;

    let mut body = Box::pin(body);
    while let Some(frame) = runtime.block_on(body.frame()) {
        if let Ok(data) = frame?.into_data() {
            out.write_all(&data)?;
        }
    }
    Ok(())
}

/// Serves `path` on a runtime built for this one call.
///
/// Used by outputs that are not already tied to a tokio runtime.
pub(super) fn serve_standalone<O: ResponseOutput + ?Sized>(
    out: &mut O,
    request: &Request<()>,
    path: &Path,
) -> io::Result<()> {
    let runtime = runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    serve(out, request, path, runtime.handle())
}

fn file_request(request: &Request<()>) -> Request<()> {
    let mut copied = Request::new(());
    *copied.method_mut() = request.method().clone();
    *copied.uri_mut() = request.uri().clone();
    *copied.headers_mut() = request.headers().clone();
    copied
}
