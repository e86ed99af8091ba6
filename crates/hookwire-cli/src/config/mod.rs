//! CLI configuration.
//!
//! ```text
//! Cli
//! ├── server: ListenerConfig       # Host, port, TLS, shutdown
//! ├── middleware: MiddlewareConfig # Request timeout
//! └── hooks: HooksConfig           # Secrets, subscriptions, mount paths
//! ```
//!
//! Every option can be given as an argument or an environment variable;
//! see `hookwire --help`.

mod hooks;
mod middleware;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use hooks::{HooksConfig, subscription};
use hookwire_server::ListenerConfig;
pub use middleware::MiddlewareConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "hookwire")]
#[command(about = "Receives, verifies and logs webhook deliveries")]
#[command(version)]
pub struct Cli {
    /// Network binding and lifecycle.
    #[clap(flatten)]
    pub server: ListenerConfig,

    /// HTTP middleware.
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Provider hooks.
    #[clap(flatten)]
    pub hooks: HooksConfig,
}

impl Cli {
    /// Loads `.env` (with the `dotenv` feature) and parses the arguments.
    ///
    /// The `.env` file is loaded first so its variables act as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.hooks.validate().context("invalid hook configuration")?;
        Ok(())
    }

    /// Logs the configuration without secrets.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.server.host,
            port = self.server.port,
            tls = self.server.is_tls_enabled(),
            shutdown_timeout_secs = self.server.shutdown_timeout,
            "server configuration"
        );

        self.middleware.log();
        self.hooks.log();
    }

    /// Returns the enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [
            cfg!(feature = "tls").then_some("tls"),
            cfg!(feature = "dotenv").then_some("dotenv"),
            cfg!(feature = "pepo-verify").then_some("pepo-verify"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flattened_groups_parse() {
        let cli = Cli::try_parse_from([
            "hookwire",
            "--port",
            "8080",
            "--request-timeout",
            "10",
            "--github-events",
            "push",
        ])
        .unwrap();

        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.middleware.recovery.request_timeout, 10);
        assert_eq!(cli.hooks.github_events, ["push"]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn invalid_groups_are_reported() {
        let cli = Cli::try_parse_from(["hookwire", "--port", "80"]).unwrap();
        let error = cli.validate().unwrap_err();
        assert!(error.to_string().contains("server configuration"));
    }

    #[test]
    fn enabled_features_are_declared() {
        for feature in Cli::enabled_features() {
            assert!(["tls", "dotenv", "pepo-verify"].contains(&feature), "{feature}");
        }
    }
}
