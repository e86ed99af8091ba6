//! Serving the router with graceful shutdown.

/// Tracing target for listener startup.
pub const TRACING_TARGET_STARTUP: &str = "hookwire_server::server::startup";

/// Tracing target for listener shutdown.
pub const TRACING_TARGET_SHUTDOWN: &str = "hookwire_server::server::shutdown";

mod config;
mod error;
mod http_server;
#[cfg(feature = "tls")]
mod https_server;
mod lifecycle;
mod shutdown;

pub use config::ListenerConfig;
pub use error::{ServerError, ServerResult};
pub use http_server::serve;
#[cfg(feature = "tls")]
pub use https_server::{serve_tls, validate_tls_files};
pub use shutdown::shutdown_signal;
