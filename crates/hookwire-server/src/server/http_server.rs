//! Plain HTTP serving.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use super::lifecycle::serve_with_shutdown;
use super::shutdown::drain;
use super::{ListenerConfig, ServerError, ServerResult, TRACING_TARGET_STARTUP, shutdown_signal};

/// Serves the router over HTTP until a shutdown signal is received.
///
/// In-flight deliveries get the configured shutdown timeout to complete.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the address cannot be
/// bound or the server fails while running.
pub async fn serve(router: Router, config: &ListenerConfig) -> ServerResult<()> {
    config.validate()?;

    let addr = config.server_addr();
    let listener = TcpListener::bind(addr).await.map_err(|err| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %addr,
            error = %err,
            "failed to bind to address"
        );
        ServerError::bind_error(addr, err)
    })?;

    serve_on(listener, router, config, shutdown_signal()).await
}

async fn serve_on<G>(
    listener: TcpListener,
    router: Router,
    config: &ListenerConfig,
    stop: G,
) -> ServerResult<()>
where
    G: Future<Output = ()> + Send + 'static,
{
    let timeout = config.shutdown_timeout();
    serve_with_shutdown(config, || {
        drain(stop, timeout, move |stop| async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(stop)
            .await
        })
    })
    .await
}
