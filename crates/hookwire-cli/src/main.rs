#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod routes;

use std::process;

use anyhow::Context;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "hookwire_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "hookwire_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "hookwire_cli::config";
pub const TRACING_TARGET_DELIVERY: &str = "hookwire_cli::delivery";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        "starting hookwire"
    );

    cli.log();
    cli.validate()?;

    let router = routes::create_router(&cli.hooks, &cli.middleware)
        .context("failed to create webhook routes")?;

    serve(router, &cli).await
}

#[cfg(feature = "tls")]
async fn serve(router: axum::Router, cli: &Cli) -> anyhow::Result<()> {
    if cli.server.is_tls_enabled() {
        hookwire_server::serve_tls(router, &cli.server).await?;
    } else {
        hookwire_server::serve(router, &cli.server).await?;
    }

    Ok(())
}

#[cfg(not(feature = "tls"))]
async fn serve(router: axum::Router, cli: &Cli) -> anyhow::Result<()> {
    if cli.server.is_tls_enabled() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "TLS paths are set but the tls feature is disabled, serving plain HTTP"
        );
    }

    hookwire_server::serve(router, &cli.server).await?;
    Ok(())
}
