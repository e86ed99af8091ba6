#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod handler;
mod listener;
pub mod middleware;
mod server;

pub use crate::error::ErrorResponse;
pub use crate::handler::WebhookHandler;
pub use crate::listener::{TRACING_TARGET, WebhookListener, webhook_route};
#[cfg(feature = "tls")]
#[cfg_attr(docsrs, doc(cfg(feature = "tls")))]
pub use crate::server::{serve_tls, validate_tls_files};
pub use crate::server::{
    ListenerConfig, ServerError, ServerResult, TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP,
    serve, shutdown_signal,
};
