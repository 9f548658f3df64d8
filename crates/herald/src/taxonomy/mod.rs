//! Machine-readable error vocabulary and error envelopes.
//!
//! API clients dispatch on [`ErrorKind`] rather than on status codes alone:
//! a `404` may mean an unknown snap or an unknown app, and only the kind
//! tells them apart. The generic responders in [`responders`] cover the
//! standard status codes; handlers that need a specific kind build an
//! [`ErrorResult`] themselves and pass it to
//! [`Response::error`](crate::Response::error).

pub mod responders;
#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Discriminator carried in the `kind` field of an error result.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// The store requires a second authentication factor.
    TwoFactorRequired,
    /// The second authentication factor was rejected.
    TwoFactorFailed,
    /// The request needs an authenticated user.
    LoginRequired,
    /// Supplied credentials were malformed.
    InvalidAuthData,
    /// The user has not accepted the store terms.
    TermsNotAccepted,
    /// The user has no payment method on file.
    NoPaymentMethods,
    /// The payment was declined.
    PaymentDeclined,
    /// The password does not satisfy the store policy.
    PasswordPolicy,
    /// The snap is already installed.
    SnapAlreadyInstalled,
    /// The snap is not installed.
    SnapNotInstalled,
    /// No snap with the requested name exists.
    SnapNotFound,
    /// No app with the requested name exists.
    AppNotFound,
    /// The snap was installed locally and has no store counterpart.
    SnapLocal,
    /// No newer revision of the snap is available.
    SnapNoUpdateAvailable,
    /// The uploaded file is not a snap.
    SnapNotASnap,
    /// The snap needs devmode confinement to be installed.
    SnapNeedsDevmode,
    /// The snap needs classic confinement to be installed.
    SnapNeedsClassic,
    /// The snap needs a system that supports classic confinement.
    SnapNeedsClassicSystem,
    /// A query parameter was malformed.
    BadQuery,
    /// A network operation timed out.
    NetworkTimeout,
}

impl ErrorKind {
    /// Returns the wire string for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Payload of an `error` envelope.
///
/// `message` is always emitted, even when empty. `kind` and `value` are
/// omitted when absent; an absent kind means a generic error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    /// Human-readable description.
    pub message: String,
    /// Machine-readable discriminator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Offending identifier or other structured detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ErrorResult {
    /// Creates a generic error result with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            value: None,
        }
    }

    /// Attaches a machine-readable kind.
    #[must_use]
    pub const fn with_kind(mut self, kind: ErrorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Attaches a structured value, such as the name that was not found.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}
