//! Signed-document responses.
//!
//! Documents are served in their canonical signed form with a media type
//! that tells clients whether to expect one document or a bundle, and a
//! count header so they can check nothing was lost in transit.

mod encoder;

use std::fmt;

use http::header::{CONTENT_TYPE, HeaderName};
use http::{HeaderValue, StatusCode};
use tracing::warn;

use crate::output::ResponseOutput;

pub use self::encoder::{DocumentEncodeError, DocumentEncoder, RawDocument, SignedDocument};

const ASSERTIONS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::assertions");

/// Media type of a single signed document.
pub const ASSERTION_MEDIA_TYPE: &str = "application/x.ubuntu.assertion";

/// Media type of a bundle of signed documents.
pub const ASSERTION_BUNDLE_MEDIA_TYPE: &str = "application/x.ubuntu.assertion; bundle=y";

/// Header reporting how many documents the body carries.
pub const ASSERTIONS_COUNT_HEADER: &str = "x-ubuntu-assertions-count";

/// An ordered sequence of signed documents served as one body.
pub struct AssertionBundle {
    documents: Vec<Box<dyn SignedDocument>>,
    bundle: bool,
}

impl AssertionBundle {
    /// Creates a response over `documents`.
    ///
    /// More than one document always produces a bundle, whatever `bundle`
    /// requests.
    #[must_use]
    pub fn new(documents: Vec<Box<dyn SignedDocument>>, bundle: bool) -> Self {
        let forced = bundle || documents.len() > 1;
        Self {
            documents,
            bundle: forced,
        }
    }

    /// Returns whether the response is declared as a bundle.
    #[must_use]
    pub const fn is_bundle(&self) -> bool {
        self.bundle
    }

    /// Returns the number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` when there are no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Returns the media type the response is served with.
    #[must_use]
    pub const fn media_type(&self) -> &'static str {
        if self.bundle {
            ASSERTION_BUNDLE_MEDIA_TYPE
        } else {
            ASSERTION_MEDIA_TYPE
        }
    }

    pub(crate) fn serve<O: ResponseOutput + ?Sized>(self, out: &mut O) {
        let headers = out.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(self.media_type()));
        headers.insert(
            HeaderName::from_static(ASSERTIONS_COUNT_HEADER),
            HeaderValue::from(self.documents.len()),
        );
        if let Err(error) = out.write_head(StatusCode::OK) {
            warn!(target: ASSERTIONS_TARGET, %error, "cannot write response");
            return;
        }

        let mut encoder = DocumentEncoder::new(out);
        for document in &self.documents {
            if let Err(error) = encoder.encode(document.as_ref()) {
                warn!(
                    target: ASSERTIONS_TARGET,
                    %error,
                    written = encoder.written(),
                    "cannot write encoded assertion into response"
                );
                break;
            }
        }
    }
}

impl fmt::Debug for AssertionBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionBundle")
            .field("documents", &self.documents.len())
            .field("bundle", &self.bundle)
            .finish()
    }
}
