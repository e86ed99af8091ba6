//! Listener lifecycle errors.

use std::io;

use thiserror::Error;

/// Result type for listener lifecycle operations.
pub type ServerResult<T> = std::result::Result<T, ServerError>;

/// Failure to start or keep running the listener.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The address could not be bound.
    #[error("failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("runtime error: {0}")]
    Runtime(#[source] io::Error),

    /// The TLS certificate or key could not be used.
    #[error("TLS certificate error: {0}")]
    TlsCertificate(String),
}

impl ServerError {
    /// Creates a bind error for an address.
    pub fn bind_error(address: impl ToString, source: io::Error) -> Self {
        Self::BindError {
            address: address.to_string(),
            source,
        }
    }

    /// Returns a stable code identifying the error variant.
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "E001",
            Self::BindError { .. } => "E002",
            Self::Runtime(_) => "E003",
            Self::TlsCertificate(_) => "E004",
        }
    }

    /// Returns `true` if retrying, possibly after an environment change,
    /// may succeed without changing the configuration.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::TlsCertificate(_) => false,
            Self::BindError { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::AddrInUse | io::ErrorKind::AddrNotAvailable
            ),
            Self::Runtime(err) => matches!(
                err.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
        }
    }

    /// Returns a human-readable hint for resolving the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::InvalidConfig(_) => {
                Some("Check the listener arguments and environment variables")
            }
            Self::BindError { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => {
                    Some("Use a port above 1024 or run with appropriate privileges")
                }
                io::ErrorKind::AddrInUse => Some(
                    "The port is already in use, choose a different port or stop the conflicting service",
                ),
                io::ErrorKind::AddrNotAvailable => {
                    Some("The address is not available, check the network interface configuration")
                }
                _ => Some("Check network configuration and firewall settings"),
            },
            Self::Runtime(err) => match err.kind() {
                io::ErrorKind::Interrupted => {
                    Some("The server was interrupted, it may be restarted")
                }
                io::ErrorKind::TimedOut => Some("Consider increasing the shutdown timeout"),
                _ => None,
            },
            Self::TlsCertificate(_) => {
                Some("Verify the certificate and key files exist and are in PEM format")
            }
        }
    }
}
