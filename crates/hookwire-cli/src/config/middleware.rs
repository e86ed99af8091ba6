//! Middleware configuration for the listener.

use anyhow::ensure;
use clap::Args;
use hookwire_server::middleware::RecoveryConfig;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound on the request timeout, in seconds.
const MAX_REQUEST_TIMEOUT: u64 = 300;

/// Middleware settings re-exported from `hookwire-server`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request timeout and panic recovery.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout range.
    pub fn validate(&self) -> anyhow::Result<()> {
        let timeout = self.recovery.request_timeout;
        ensure!(
            (1..=MAX_REQUEST_TIMEOUT).contains(&timeout),
            "request timeout of {timeout} seconds is outside 1-{MAX_REQUEST_TIMEOUT} seconds"
        );
        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "recovery configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_timeout_range() {
        let mut config = MiddlewareConfig {
            recovery: RecoveryConfig::default(),
        };
        assert!(config.validate().is_ok());

        config.recovery.request_timeout = 0;
        assert!(config.validate().is_err());

        config.recovery.request_timeout = 301;
        assert!(config.validate().is_err());
    }
}
