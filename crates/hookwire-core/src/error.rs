//! Structured error handling for webhook intake.

use hipstr::HipStr;
use http::StatusCode;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;

/// Type alias for boxed dynamic errors that can be sent across threads.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for Results with our custom Error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Categories of errors a webhook delivery can be rejected with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request method was not `POST`.
    InvalidMethod,
    /// The subscription was required but empty.
    NoEventSpecified,
    /// The provider's event header (or event field) was absent.
    MissingEventHeader,
    /// The delivered event is not part of the subscription.
    EventNotSubscribed,
    /// A secret is configured but the signature header is absent.
    MissingSignatureHeader,
    /// The signature did not verify against the configured secret.
    SignatureMismatch,
    /// A hook UUID is configured but the delivery carries none.
    MissingHookUuid,
    /// The delivery's hook UUID differs from the configured one.
    HookUuidMismatch,
    /// The body could not be read or the payload could not be decoded.
    ParseError,
}

impl ErrorKind {
    /// Returns the HTTP status a receiver should answer the sender with.
    ///
    /// This is a recommendation only; the core never writes responses.
    #[must_use]
    pub const fn status_code(self) -> StatusCode {
        match self {
            Self::InvalidMethod => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingSignatureHeader
            | Self::SignatureMismatch
            | Self::MissingHookUuid
            | Self::HookUuidMismatch => StatusCode::UNAUTHORIZED,
            Self::NoEventSpecified
            | Self::MissingEventHeader
            | Self::EventNotSubscribed
            | Self::ParseError => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns `true` if the delivery failed authentication.
    #[must_use]
    pub const fn is_authentication_failure(self) -> bool {
        matches!(
            self,
            Self::MissingSignatureHeader
                | Self::SignatureMismatch
                | Self::MissingHookUuid
                | Self::HookUuidMismatch
        )
    }

    /// Returns a short human-readable description of the error kind.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::InvalidMethod => "invalid HTTP method",
            Self::NoEventSpecified => "no event specified to parse",
            Self::MissingEventHeader => "missing event header",
            Self::EventNotSubscribed => "event not defined to be parsed",
            Self::MissingSignatureHeader => "missing signature header",
            Self::SignatureMismatch => "signature verification failed",
            Self::MissingHookUuid => "missing hook uuid header",
            Self::HookUuidMismatch => "hook uuid verification failed",
            Self::ParseError => "error parsing payload",
        }
    }
}

/// Structured error type with classification and an optional cause.
#[must_use]
#[derive(Debug, Error)]
#[error("[{kind}] {}{}", .kind.description(), .message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Additional detail about the failure.
    pub message: Option<HipStr<'static>>,
    /// Underlying source error, if any.
    #[source]
    pub source: Option<BoxedError>,
}

impl Error {
    /// Creates a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Creates a new error from a source error.
    pub fn from_source(kind: ErrorKind, source: impl Into<BoxedError>) -> Self {
        Self {
            kind,
            message: None,
            source: Some(source.into()),
        }
    }

    /// Creates a [`ErrorKind::ParseError`] with the given message.
    pub fn parse(message: impl Into<HipStr<'static>>) -> Self {
        Self::new(ErrorKind::ParseError).with_message(message)
    }

    /// Adds a message to this error.
    pub fn with_message(mut self, message: impl Into<HipStr<'static>>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the source of the error.
    pub fn with_source(mut self, source: impl Into<BoxedError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the recommended HTTP status for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        self.kind.status_code()
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::from_source(ErrorKind::ParseError, error).with_message("invalid JSON payload")
    }
}
