//! The canonical JSON envelope behind `sync`, `async` and `error` responses.
//!
//! Every envelope serialises to a single object:
//!
//! ```json
//! {"type":"sync","status-code":200,"status":"OK","result":{},"sources":["store"]}
//! ```
//!
//! Metadata fields are flattened next to `result` and omitted when absent.
//! The result is held behind [`EncodeResult`] and only encoded when the
//! response is served, so an unencodable result degrades that one response
//! to an empty `500` instead of failing the handler.

#[cfg(test)]
mod tests;
mod wire;

use std::fmt;

use http::header::{CONTENT_TYPE, LOCATION};
use http::{HeaderValue, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::Display;
use thiserror::Error;
use tracing::warn;

use crate::output::ResponseOutput;
use crate::taxonomy::ErrorResult;

pub use self::wire::WireEnvelope;

const ENVELOPE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::envelope");

/// Media type of every envelope body.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Value of the envelope `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseType {
    /// Immediate result.
    Sync,
    /// Background operation accepted for processing.
    Async,
    /// Failure.
    Error,
}

/// Page position reported alongside a partial listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    /// One-based index of the returned page.
    pub page: i64,
    /// Total number of pages.
    pub pages: i64,
}

/// Optional metadata flattened into the envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Meta {
    /// Backends that contributed to the result, in query order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Page position of a partial listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<Paging>,
    /// Currency the store suggests for prices in the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_currency: Option<String>,
    /// Identifier of the change spawned by the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<String>,
}

impl Meta {
    /// Records the sources consulted for the result.
    #[must_use]
    pub fn with_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sources = sources.into_iter().map(Into::into).collect();
        self
    }

    /// Records the page position.
    #[must_use]
    pub const fn with_paging(mut self, page: i64, pages: i64) -> Self {
        self.paging = Some(Paging { page, pages });
        self
    }

    /// Records the suggested currency.
    #[must_use]
    pub fn with_suggested_currency(mut self, currency: impl Into<String>) -> Self {
        self.suggested_currency = Some(currency.into());
        self
    }

    /// Records the change identifier.
    #[must_use]
    pub fn with_change(mut self, change: impl Into<String>) -> Self {
        self.change = Some(change.into());
        self
    }

    /// Returns `true` when no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A result payload that can be encoded into JSON when served.
///
/// Implemented for every `Serialize + Send` type; handlers rarely need to
/// implement it by hand.
pub trait EncodeResult: Send {
    /// Encodes the payload as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error when the payload cannot be represented
    /// as JSON.
    fn encode_result(&self) -> serde_json::Result<Value>;
}

impl<T: Serialize + Send> EncodeResult for T {
    fn encode_result(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Errors raised while encoding an envelope.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The result payload could not be encoded.
    #[error("cannot encode {kind} result: {source}")]
    Result {
        /// Envelope type being encoded.
        kind: ResponseType,
        /// Serializer failure.
        #[source]
        source: serde_json::Error,
    },
    /// The assembled envelope could not be encoded.
    #[error("cannot encode {kind} envelope: {source}")]
    Envelope {
        /// Envelope type being encoded.
        kind: ResponseType,
        /// Serializer failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Status, type, result and metadata of one `sync`, `async` or `error`
/// response.
pub struct Envelope {
    status: StatusCode,
    kind: ResponseType,
    result: Box<dyn EncodeResult>,
    meta: Option<Meta>,
}

#[derive(Serialize)]
struct EnvelopeDocument<'a> {
    #[serde(rename = "type")]
    kind: ResponseType,
    #[serde(rename = "status-code")]
    status_code: u16,
    status: &'a str,
    result: Value,
    #[serde(flatten)]
    meta: Option<&'a Meta>,
}

/// Body bytes plus the `Location` the body implies.
struct EncodedEnvelope {
    body: Vec<u8>,
    location: Option<String>,
}

impl Envelope {
    pub(crate) fn sync(result: Box<dyn EncodeResult>, meta: Option<Meta>) -> Self {
        Self {
            status: StatusCode::OK,
            kind: ResponseType::Sync,
            result,
            meta,
        }
    }

    pub(crate) fn asynchronous(operation: Map<String, Value>, meta: Option<Meta>) -> Self {
        Self {
            status: StatusCode::ACCEPTED,
            kind: ResponseType::Async,
            result: Box::new(operation),
            meta,
        }
    }

    pub(crate) fn error(status: StatusCode, result: ErrorResult) -> Self {
        Self {
            status,
            kind: ResponseType::Error,
            result: Box::new(result),
            meta: None,
        }
    }

    /// Returns the HTTP status the envelope will be served with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the envelope type.
    #[must_use]
    pub const fn kind(&self) -> ResponseType {
        self.kind
    }

    /// Returns the metadata, if any.
    #[must_use]
    pub const fn meta(&self) -> Option<&Meta> {
        self.meta.as_ref()
    }

    /// Encodes the envelope document.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the result or the envelope cannot be
    /// encoded.
    pub fn to_json(&self) -> Result<Vec<u8>, EncodeError> {
        self.encode().map(|encoded| encoded.body)
    }

    fn encode(&self) -> Result<EncodedEnvelope, EncodeError> {
        let result = self
            .result
            .encode_result()
            .map_err(|source| EncodeError::Result {
                kind: self.kind,
                source,
            })?;
        let location = resource_location(self.status, &result).map(str::to_owned);
        let document = EnvelopeDocument {
            kind: self.kind,
            status_code: self.status.as_u16(),
            status: self.status.canonical_reason().unwrap_or_default(),
            result,
            meta: self.meta.as_ref().filter(|meta| !meta.is_empty()),
        };
        let body = serde_json::to_vec(&document).map_err(|source| EncodeError::Envelope {
            kind: self.kind,
            source,
        })?;
        Ok(EncodedEnvelope { body, location })
    }

    pub(crate) fn serve<O: ResponseOutput + ?Sized>(self, out: &mut O) {
        let (status, body) = match self.encode() {
            Ok(encoded) => {
                if let Some(location) = encoded.location {
                    set_location(out, &location);
                }
                (self.status, encoded.body)
            }
            Err(error) => {
                warn!(
                    target: ENVELOPE_TARGET,
                    %error,
                    status = self.status.as_u16(),
                    "cannot marshal response to JSON"
                );
                (StatusCode::INTERNAL_SERVER_ERROR, Vec::new())
            }
        };

        out.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        let written = out.write_head(status).and_then(|()| out.write_all(&body));
        if let Err(error) = written {
            warn!(target: ENVELOPE_TARGET, %error, "cannot write response");
        }
    }
}

impl fmt::Debug for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envelope")
            .field("status", &self.status)
            .field("kind", &self.kind)
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Extracts the locator of a created or accepted resource.
fn resource_location(status: StatusCode, result: &Value) -> Option<&str> {
    if status != StatusCode::CREATED && status != StatusCode::ACCEPTED {
        return None;
    }
    result
        .get("resource")
        .and_then(Value::as_str)
        .filter(|location| !location.is_empty())
}

fn set_location<O: ResponseOutput + ?Sized>(out: &mut O, location: &str) {
    match HeaderValue::from_str(location) {
        Ok(value) => {
            out.headers_mut().insert(LOCATION, value);
        }
        Err(error) => warn!(
            target: ENVELOPE_TARGET,
            %error,
            location,
            "cannot set Location header"
        ),
    }
}
