//! Process configuration, read once at startup
//!
//! Every required value must be present and non-empty; otherwise the service
//! refuses to start.

use std::env;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use common::database::DatabaseConfig;
use common::error::DatabaseError;
use thiserror::Error;

use crate::jwt::JwtConfig;

/// Default listen address, `0.0.0.0:3000`
pub fn default_server_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 3000))
}

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("{var} has an invalid value: {value:?}")]
    Invalid { var: &'static str, value: String },

    /// Database section could not be loaded
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Read a required variable; empty values count as missing
pub(crate) fn required(var: &'static str) -> Result<String, ConfigError> {
    env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(var))
}

/// Read an optional variable, falling back to `default` when unset or empty
pub(crate) fn optional<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        _ => Ok(default),
    }
}

/// Complete service configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub server_addr: SocketAddr,
}

impl AppConfig {
    /// Load the whole configuration from the environment
    ///
    /// # Environment Variables
    /// - `SERVER_ADDR`: listen address (default: `0.0.0.0:3000`)
    /// - see [`DatabaseConfig::from_env`] and [`JwtConfig::from_env`] for the rest
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt = JwtConfig::from_env()?;
        let database = DatabaseConfig::from_env()?;

        let server_addr = optional("SERVER_ADDR", default_server_addr())?;

        Ok(Self {
            database,
            jwt,
            server_addr,
        })
    }
}
