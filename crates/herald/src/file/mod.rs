//! File downloads.
//!
//! The response names the file as an attachment and hands the rest to the
//! output's static-file behaviour, which owns ranges, conditional requests
//! and media types.


use std::path::{Path, PathBuf};

use http::header::CONTENT_DISPOSITION;
use http::{HeaderValue, Request};
use tracing::warn;

use crate::output::ResponseOutput;

const FILE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::file");

/// A filesystem resource served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    path: PathBuf,
}

impl FileResponse {
    /// Creates a download of the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path being served.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the `Content-Disposition` value for the download.
    #[must_use]
    pub fn disposition(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|base| base.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("attachment; filename={name}")
    }

    pub(crate) fn serve<O: ResponseOutput + ?Sized>(self, out: &mut O, request: &Request<()>) {
        match HeaderValue::from_str(&self.disposition()) {
            Ok(value) => {
                out.headers_mut().insert(CONTENT_DISPOSITION, value);
            }
            Err(error) => warn!(
                target: FILE_TARGET,
                %error,
                path = %self.path.display(),
                "cannot describe attachment"
            ),
        }
        if let Err(error) = out.serve_file(request, &self.path) {
            warn!(
                target: FILE_TARGET,
                %error,
                path = %self.path.display(),
                "cannot serve file"
            );
        }
    }
}
