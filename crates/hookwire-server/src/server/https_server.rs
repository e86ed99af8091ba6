//! HTTPS serving with rustls.

use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

use super::lifecycle::serve_with_shutdown;
use super::shutdown::drain;
use super::{ListenerConfig, ServerError, ServerResult, TRACING_TARGET_STARTUP, shutdown_signal};

/// Serves the router over HTTPS until a shutdown signal is received.
///
/// In-flight deliveries get the configured shutdown timeout to complete.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, TLS paths are missing
/// or unusable, or the server fails while running.
pub async fn serve_tls(router: Router, config: &ListenerConfig) -> ServerResult<()> {
    config.validate()?;

    let (Some(cert_path), Some(key_path)) = (&config.tls_cert_path, &config.tls_key_path) else {
        return Err(ServerError::InvalidConfig(
            "TLS certificate and key paths are required to serve HTTPS".to_owned(),
        ));
    };

    validate_tls_files(cert_path, key_path)?;

    let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|err| {
            ServerError::TlsCertificate(format!("failed to load TLS certificates: {err}"))
        })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "TLS certificates loaded"
    );

    let addr = config.server_addr();
    let shutdown_timeout = config.shutdown_timeout();

    serve_with_shutdown(config, || {
        drain(shutdown_signal(), shutdown_timeout, move |stop| async move {
            let handle = axum_server::Handle::new();
            let shutdown_handle = handle.clone();

            tokio::spawn(async move {
                stop.await;
                shutdown_handle.graceful_shutdown(Some(shutdown_timeout));
            });

            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(router.into_make_service_with_connect_info::<SocketAddr>())
                .await
        })
    })
    .await
}

/// Checks that the certificate and key paths name non-empty files.
///
/// # Errors
///
/// Returns [`ServerError::TlsCertificate`] naming the first unusable file.
pub fn validate_tls_files(cert_path: &Path, key_path: &Path) -> ServerResult<()> {
    let validate_file = |path: &Path, file_type: &str| -> ServerResult<()> {
        let metadata = std::fs::metadata(path).map_err(|err| {
            ServerError::TlsCertificate(format!(
                "cannot read {file_type} file {}: {err}",
                path.display()
            ))
        })?;

        if !metadata.is_file() {
            return Err(ServerError::TlsCertificate(format!(
                "{file_type} path is not a file: {}",
                path.display()
            )));
        }

        if metadata.len() == 0 {
            return Err(ServerError::TlsCertificate(format!(
                "{file_type} file is empty: {}",
                path.display()
            )));
        }

        Ok(())
    };

    validate_file(cert_path, "certificate")?;
    validate_file(key_path, "private key")?;

    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        cert_path = %cert_path.display(),
        key_path = %key_path.display(),
        "TLS files validated"
    );

    Ok(())
}
