//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use roshambo::{RegistryConfig, RegistryConfigError};
use std::net::SocketAddr;

/// Default bind address when neither `--bind` nor `SERVER_BIND` is set
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Prometheus exporter bind address, if metrics are enabled
    pub metrics_bind: Option<SocketAddr>,
    /// Room registry configuration
    pub registry: RegistryConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `bind_override` - Optional bind address override (from CLI args)
    /// * `metrics_bind_override` - Optional metrics address override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<ServerConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if an address variable is set but unparseable
    pub fn from_env(
        bind_override: Option<SocketAddr>,
        metrics_bind_override: Option<SocketAddr>,
    ) -> Result<Self, ConfigError> {
        let bind = match bind_override {
            Some(bind) => bind,
            None => match parse_addr_env("SERVER_BIND")? {
                Some(bind) => bind,
                None => parse_addr("SERVER_BIND", DEFAULT_BIND)?,
            },
        };

        let metrics_bind = match metrics_bind_override {
            Some(bind) => Some(bind),
            None => parse_addr_env("METRICS_BIND")?,
        };

        let defaults = RegistryConfig::default();
        let registry = RegistryConfig {
            inbox_capacity: parse_env_or("ROOM_INBOX_CAPACITY", defaults.inbox_capacity),
            outbound_buffer: parse_env_or("OUTBOUND_BUFFER", defaults.outbound_buffer),
        };

        Ok(ServerConfig {
            bind,
            metrics_bind,
            registry,
        })
    }

    /// Validate configuration after loading
    ///
    /// # Returns
    ///
    /// * `Result<(), ConfigError>` - Success or validation error
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.registry.validate().map_err(|e| {
            let var = match e {
                RegistryConfigError::ZeroInboxCapacity => "ROOM_INBOX_CAPACITY",
                RegistryConfigError::ZeroOutboundBuffer => "OUTBOUND_BUFFER",
            };
            ConfigError::Invalid {
                var: var.to_string(),
                reason: e.to_string(),
            }
        })?;

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid address in {var}: {value}")]
    InvalidAddress { var: String, value: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn parse_addr(var: &str, value: &str) -> Result<SocketAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        var: var.to_string(),
        value: value.to_string(),
    })
}

/// Parse an optional socket address variable; unset means `None`
fn parse_addr_env(var: &str) -> Result<Option<SocketAddr>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => parse_addr(var, value.trim()).map(Some),
        _ => Ok(None),
    }
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
