//! Server configuration.
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SERVER_SERVICE_HOST` | `0.0.0.0` | bind host (IP or hostname) |
//! | `SERVER_SERVICE_PORT` | `50051` | gRPC port |
//! | `SERVER_SERVICE_LOG_LEVEL` | `local` | log profile (`local`, `dev`, `prod`) |
//! | `TRACKING_MERGE_STRATEGY` | `atomic` | `atomic` or `create-then-merge` |
//! | `TRACKING_ABSENT_ARRIVALS` | `zero` | `zero` or `exclude` |

use std::net::{SocketAddr, ToSocketAddrs};

use thiserror::Error;

use crate::engine::{EngineConfig, MergeStrategy};
use crate::logging::LogProfile;
use crate::report::ArrivalAccounting;

/// Bind host variable.
pub const ENV_HOST: &str = "SERVER_SERVICE_HOST";
/// gRPC port variable.
pub const ENV_PORT: &str = "SERVER_SERVICE_PORT";
/// Log profile variable.
pub const ENV_LOG_LEVEL: &str = "SERVER_SERVICE_LOG_LEVEL";
/// Merge strategy variable.
pub const ENV_MERGE_STRATEGY: &str = "TRACKING_MERGE_STRATEGY";
/// Absent-arrival accounting variable.
pub const ENV_ABSENT_ARRIVALS: &str = "TRACKING_ABSENT_ARRIVALS";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 50051;

/// Errors raised while loading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be parsed.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        /// Variable name.
        key: &'static str,
        /// Raw value found.
        value: String,
        /// What was expected instead.
        reason: &'static str,
    },

    /// The bind host did not resolve to any socket address.
    #[error("Failed to resolve bind address {host}:{port}: {reason}")]
    Unresolvable {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver failure.
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: &'static str) -> Self {
        Self::InvalidValue {
            key,
            value: value.to_string(),
            reason,
        }
    }
}

/// Configuration of the tracking server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host name or IP the gRPC server binds to.
    pub host: String,
    /// gRPC port.
    pub port: u16,
    /// Log output profile.
    pub log_profile: LogProfile,
    /// Engine behaviour.
    pub engine: EngineConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_profile: LogProfile::default(),
            engine: EngineConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from process environment variables.
    ///
    /// Unset or empty variables fall back to their defaults.
    ///
    /// # Errors
    /// Returns `InvalidValue` for a variable that is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns `InvalidValue` for a key whose value is unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(ENV_HOST).map_or_else(|| DEFAULT_HOST.to_string(), |h| h.trim().to_string());

        let port = match get(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_PORT, &raw, "expected a port number"))?,
            None => DEFAULT_PORT,
        };

        let log_profile = match get(ENV_LOG_LEVEL) {
            Some(raw) => LogProfile::parse(&raw)
                .ok_or_else(|| ConfigError::invalid(ENV_LOG_LEVEL, &raw, "expected local, dev or prod"))?,
            None => LogProfile::default(),
        };

        let merge_strategy = match get(ENV_MERGE_STRATEGY) {
            Some(raw) => MergeStrategy::parse(&raw).ok_or_else(|| {
                ConfigError::invalid(ENV_MERGE_STRATEGY, &raw, "expected atomic or create-then-merge")
            })?,
            None => MergeStrategy::default(),
        };

        let arrival_accounting = match get(ENV_ABSENT_ARRIVALS) {
            Some(raw) => ArrivalAccounting::parse(&raw)
                .ok_or_else(|| ConfigError::invalid(ENV_ABSENT_ARRIVALS, &raw, "expected zero or exclude"))?,
            None => ArrivalAccounting::default(),
        };

        Ok(Self {
            host,
            port,
            log_profile,
            engine: EngineConfig {
                merge_strategy,
                arrival_accounting,
            },
        })
    }

    /// Resolves host and port to the address the server binds.
    ///
    /// Hostnames go through the system resolver; the first address wins.
    ///
    /// # Errors
    /// Returns `Unresolvable` if the host yields no address.
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        let unresolvable = |reason: String| ConfigError::Unresolvable {
            host: self.host.clone(),
            port: self.port,
            reason,
        };
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| unresolvable(e.to_string()))?
            .next()
            .ok_or_else(|| unresolvable("no addresses returned".to_string()))
    }

    /// Engine configuration derived from this server configuration.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        self.engine
    }
}
