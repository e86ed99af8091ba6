//! Network binding and lifecycle configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use super::{ServerError, ServerResult};

/// Upper bound on the graceful shutdown timeout, in seconds.
const MAX_SHUTDOWN_TIMEOUT: u64 = 300;

/// Where and how the listener accepts connections.
///
/// # Environment Variables
///
/// With the `config` feature every field can be set from the environment:
/// - `HOST` - address to bind (default: 127.0.0.1)
/// - `PORT` - port to listen on (default: 3000, valid range: 1024-65535)
/// - `SHUTDOWN_TIMEOUT` - graceful shutdown timeout in seconds (default: 30, max: 300)
/// - `TLS_CERT_PATH` / `TLS_KEY_PATH` - PEM certificate chain and private key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ListenerConfig {
    /// Host address to bind to.
    ///
    /// Webhook senders are usually remote, so production deployments either
    /// bind to a public interface or sit behind a reverse proxy.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "HOST", default_value = "127.0.0.1")
    )]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// TCP port to listen on.
    #[cfg_attr(
        feature = "config",
        arg(short = 'p', long, env = "PORT", default_value_t = 3000)
    )]
    pub port: u16,

    /// Seconds to wait for in-flight deliveries on shutdown.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)
    )]
    pub shutdown_timeout: u64,

    /// Path to the TLS certificate chain (PEM).
    #[cfg_attr(feature = "config", arg(long, env = "TLS_CERT_PATH"))]
    #[serde(default)]
    pub tls_cert_path: Option<PathBuf>,

    /// Path to the TLS private key (PEM).
    #[cfg_attr(feature = "config", arg(long, env = "TLS_KEY_PATH"))]
    #[serde(default)]
    pub tls_key_path: Option<PathBuf>,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ListenerConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::InvalidConfig`] if:
    /// - the port is below 1024
    /// - the shutdown timeout is outside 1-300 seconds
    /// - only one of the TLS certificate and key paths is set
    pub fn validate(&self) -> ServerResult<()> {
        if self.port < 1024 {
            return Err(ServerError::InvalidConfig(format!(
                "port {} is below 1024, use ports 1024-65535 to avoid requiring root privileges",
                self.port
            )));
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > MAX_SHUTDOWN_TIMEOUT {
            return Err(ServerError::InvalidConfig(format!(
                "shutdown timeout of {} seconds is outside 1-{MAX_SHUTDOWN_TIMEOUT} seconds",
                self.shutdown_timeout
            )));
        }

        if self.tls_cert_path.is_some() != self.tls_key_path.is_some() {
            return Err(ServerError::InvalidConfig(
                "TLS certificate and key paths must be provided together".to_owned(),
            ));
        }

        Ok(())
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns `true` if the host is an unspecified address such as `0.0.0.0`.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        match self.host {
            IpAddr::V4(addr) => addr.is_unspecified(),
            IpAddr::V6(addr) => addr.is_unspecified(),
        }
    }

    /// Returns `true` if both TLS paths are set.
    #[must_use]
    pub const fn is_tls_enabled(&self) -> bool {
        self.tls_cert_path.is_some() && self.tls_key_path.is_some()
    }

    /// Sets the address to bind.
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.host = addr.ip();
        self.port = addr.port();
        self
    }

    /// Sets the TLS certificate and key paths.
    pub fn with_tls(mut self, cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        self.tls_cert_path = Some(cert_path.into());
        self.tls_key_path = Some(key_path.into());
        self
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 3000,
            shutdown_timeout: 30,
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ListenerConfig::default();
        assert!(config.validate().is_ok());
        assert!(!config.binds_to_all_interfaces());
        assert!(!config.is_tls_enabled());
        assert_eq!(config.server_addr(), "127.0.0.1:3000".parse().unwrap());
    }

    #[test]
    fn rejects_privileged_ports() {
        let config = ListenerConfig {
            port: 443,
            ..ListenerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ServerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn rejects_invalid_shutdown_timeouts() {
        let mut config = ListenerConfig::default();

        config.shutdown_timeout = 0;
        assert!(config.validate().is_err());

        config.shutdown_timeout = 301;
        assert!(config.validate().is_err());

        config.shutdown_timeout = 300;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn tls_paths_come_in_pairs() {
        let mut config = ListenerConfig::default();
        config.tls_cert_path = Some(PathBuf::from("cert.pem"));
        assert!(config.validate().is_err());

        let config = ListenerConfig::default().with_tls("cert.pem", "key.pem");
        assert!(config.validate().is_ok());
        assert!(config.is_tls_enabled());
    }

    #[test]
    fn all_interfaces() {
        let config = ListenerConfig::default().with_addr("0.0.0.0:8080".parse().unwrap());
        assert!(config.binds_to_all_interfaces());
        assert_eq!(config.port, 8080);
    }
}
