//! Stop signals and the bounded drain of in-flight deliveries.

use std::future::{Future, pending};
use std::io;
use std::time::Duration;

use futures::FutureExt;
use futures::future::Shared;
#[cfg(unix)]
use tokio::signal::unix;

use super::TRACING_TARGET_SHUTDOWN;

/// Resolves once the process is asked to stop: Ctrl+C, or SIGTERM on Unix.
///
/// A signal whose handler cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let signal = tokio::select! {
        () = interrupt() => "SIGINT",
        () = terminate() => "SIGTERM",
    };

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        signal,
        "stop requested, no longer accepting deliveries"
    );
}

async fn interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        unobservable("SIGINT", &err);
        pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    match unix::signal(unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(err) => {
            unobservable("SIGTERM", &err);
            pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    pending::<()>().await;
}

fn unobservable(signal: &'static str, err: &io::Error) {
    tracing::error!(
        target: TRACING_TARGET_SHUTDOWN,
        signal,
        error = %err,
        "failed to install signal handler"
    );
}

/// Runs a server until it exits on its own or `stop` resolves.
///
/// `serve` is handed `stop` to begin its own graceful shutdown. From the
/// moment `stop` resolves the server has `timeout` to finish in-flight
/// deliveries. After that it is dropped and connections it still holds are
/// abandoned.
pub(crate) async fn drain<G, S, F>(stop: G, timeout: Duration, serve: S) -> io::Result<()>
where
    G: Future<Output = ()>,
    S: FnOnce(Shared<G>) -> F,
    F: Future<Output = io::Result<()>>,
{
    let stop = stop.shared();
    let server = serve(stop.clone());
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result,
        () = stop => {}
    }

    tracing::info!(
        target: TRACING_TARGET_SHUTDOWN,
        timeout_secs = timeout.as_secs(),
        "draining in-flight deliveries"
    );

    match tokio::time::timeout(timeout, server).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "shutdown timeout elapsed, abandoning open connections"
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn server_exiting_first_is_returned() {
        let result = drain(pending::<()>(), Duration::from_secs(1), |_stop| async {
            Err(io::Error::other("accept failed"))
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_sees_the_stop() {
        let (tx, rx) = oneshot::channel::<()>();
        let stop = async move {
            let _ = rx.await;
        };

        let _ = tx.send(());
        let result = drain(stop, Duration::from_secs(5), |stop| async move {
            stop.await;
            Ok(())
        })
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn stuck_server_is_dropped_after_timeout() {
        let started = Instant::now();
        let result = drain(async {}, Duration::from_millis(100), |_stop| async {
            pending::<io::Result<()>>().await
        })
        .await;

        assert!(result.is_ok());
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
