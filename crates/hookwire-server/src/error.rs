//! JSON error bodies for rejected deliveries.

use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hookwire_core::{Error, ErrorKind};
use serde::Serialize;

/// Error body returned to a webhook sender.
///
/// Serializes as `{"name": "...", "message": "..."}`; the status is carried
/// by the response itself.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse<'a> {
    /// Stable snake_case identifier of the error.
    pub name: Cow<'a, str>,
    /// Human-readable detail, safe to return to the sender.
    pub message: Cow<'a, str>,
    /// HTTP status code (not serialized in JSON).
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "An internal server error occurred",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self = Self::new(
        "not_found",
        "No webhook is mounted at this path",
        StatusCode::NOT_FOUND,
    );
    pub const REQUEST_TIMEOUT: Self = Self::new(
        "request_timeout",
        "The delivery took too long to process",
        StatusCode::REQUEST_TIMEOUT,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            status,
        }
    }

    /// Appends detail to the message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = Cow::Owned(format!("{}: {}", self.message, message.into()));
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl From<ErrorKind> for ErrorResponse<'static> {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind.into(), kind.description(), kind.status_code())
    }
}

impl From<&Error> for ErrorResponse<'static> {
    fn from(error: &Error) -> Self {
        let response = Self::from(error.kind);
        match &error.message {
            Some(message) => response.with_message(message.as_str().to_owned()),
            None => response,
        }
    }
}

impl From<Error> for ErrorResponse<'static> {
    #[inline]
    fn from(error: Error) -> Self {
        Self::from(&error)
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
