//! Error responders bound to fixed status codes.
//!
//! ```
//! use herald::responders::{NOT_FOUND, UNAUTHORIZED};
//!
//! let missing = NOT_FOUND.respond(format_args!("cannot find change {}", 42));
//! let anonymous = UNAUTHORIZED.respond("access denied");
//! # drop((missing, anonymous));
//! ```

use std::fmt;

use http::StatusCode;

use crate::Response;

use super::{ErrorKind, ErrorResult};

/// Builds `error` envelopes for one fixed HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorResponder {
    status: StatusCode,
}

impl ErrorResponder {
    /// Binds a responder to `status`.
    #[must_use]
    pub const fn new(status: StatusCode) -> Self {
        Self { status }
    }

    /// Returns the bound status.
    #[must_use]
    pub const fn status(self) -> StatusCode {
        self.status
    }

    /// Builds an error response carrying `message`.
    ///
    /// A responder bound to `401` stamps [`ErrorKind::LoginRequired`] so
    /// clients can prompt for credentials; every other responder leaves the
    /// kind unset.
    #[must_use]
    pub fn respond(self, message: impl fmt::Display) -> Response {
        let mut result = ErrorResult::new(message.to_string());
        if self.status == StatusCode::UNAUTHORIZED {
            result = result.with_kind(ErrorKind::LoginRequired);
        }
        Response::error(self.status, result)
    }
}

/// `400 Bad Request`.
pub const BAD_REQUEST: ErrorResponder = ErrorResponder::new(StatusCode::BAD_REQUEST);
/// `401 Unauthorized`, always tagged `login-required`.
pub const UNAUTHORIZED: ErrorResponder = ErrorResponder::new(StatusCode::UNAUTHORIZED);
/// `403 Forbidden`.
pub const FORBIDDEN: ErrorResponder = ErrorResponder::new(StatusCode::FORBIDDEN);
/// `404 Not Found`.
pub const NOT_FOUND: ErrorResponder = ErrorResponder::new(StatusCode::NOT_FOUND);
/// `405 Method Not Allowed`.
pub const METHOD_NOT_ALLOWED: ErrorResponder =
    ErrorResponder::new(StatusCode::METHOD_NOT_ALLOWED);
/// `409 Conflict`.
pub const CONFLICT: ErrorResponder = ErrorResponder::new(StatusCode::CONFLICT);
/// `500 Internal Server Error`.
pub const INTERNAL_ERROR: ErrorResponder =
    ErrorResponder::new(StatusCode::INTERNAL_SERVER_ERROR);
/// `501 Not Implemented`.
pub const NOT_IMPLEMENTED: ErrorResponder = ErrorResponder::new(StatusCode::NOT_IMPLEMENTED);

/// Responds `404` for an operation on a snap that does not exist.
///
/// The snap name travels in `value` so clients can tell which of several
/// requested snaps was missing.
#[must_use]
pub fn snap_not_found(snap_name: &str, error: &dyn fmt::Display) -> Response {
    let result = ErrorResult::new(error.to_string())
        .with_kind(ErrorKind::SnapNotFound)
        .with_value(snap_name);
    Response::error(StatusCode::NOT_FOUND, result)
}

/// Responds `404` for an operation on an app that does not exist.
#[must_use]
pub fn app_not_found(message: impl fmt::Display) -> Response {
    let result = ErrorResult::new(message.to_string()).with_kind(ErrorKind::AppNotFound);
    Response::error(StatusCode::NOT_FOUND, result)
}
