//! Decoding side of the envelope, as seen by API clients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Meta, ResponseType};
use crate::taxonomy::ErrorResult;

/// An envelope read back from the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireEnvelope {
    /// Envelope type.
    #[serde(rename = "type")]
    pub kind: ResponseType,
    /// Numeric HTTP status.
    #[serde(rename = "status-code")]
    pub status_code: u16,
    /// Reason phrase for the status.
    pub status: String,
    /// Result payload; `null` when the response carried none.
    #[serde(default)]
    pub result: Value,
    /// Flattened metadata.
    #[serde(flatten)]
    pub meta: Meta,
}

impl WireEnvelope {
    /// Decodes an envelope document.
    ///
    /// # Errors
    ///
    /// Returns the deserializer's error for malformed documents.
    pub fn from_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Interprets the result as an [`ErrorResult`] for `error` envelopes.
    #[must_use]
    pub fn error_result(&self) -> Option<ErrorResult> {
        if self.kind != ResponseType::Error {
            return None;
        }
        ErrorResult::deserialize(&self.result).ok()
    }
}
