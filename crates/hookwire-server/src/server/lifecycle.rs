//! Logging around a running server.

use std::future::Future;
use std::io;
use std::time::Instant;

use super::{ListenerConfig, ServerError, ServerResult};
use super::{TRACING_TARGET_SHUTDOWN, TRACING_TARGET_STARTUP};

/// Runs a server future, logging readiness, uptime and the outcome.
pub(crate) async fn serve_with_shutdown<F>(
    config: &ListenerConfig,
    serve_fn: impl FnOnce() -> F,
) -> ServerResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "listener bound to all interfaces, ensure firewall rules are configured"
        );
    }

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %config.server_addr(),
        tls = config.is_tls_enabled(),
        shutdown_timeout_secs = config.shutdown_timeout,
        "listening for webhook deliveries"
    );

    let start_time = Instant::now();
    let result = serve_fn().await;
    let uptime_secs = start_time.elapsed().as_secs();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SHUTDOWN,
                uptime_secs,
                "shutdown completed"
            );
            Ok(())
        }
        Err(err) => {
            let error = ServerError::Runtime(err);
            tracing::error!(
                target: TRACING_TARGET_SHUTDOWN,
                error = %error,
                code = error.error_code(),
                suggestion = error.suggestion(),
                uptime_secs,
                "server stopped with an error"
            );
            Err(error)
        }
    }
}
