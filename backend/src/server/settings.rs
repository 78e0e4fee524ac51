//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ACCOUNTS_*` environment variables and
//! configuration files. Leaving a backend URL unset selects the in-memory
//! adapter for that concern.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use accounts::domain::DEFAULT_SESSION_TTL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("session TTL must be at least one second")]
    ZeroSessionTtl,
}

/// Runtime configuration for the account service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string for the user directory.
    pub database_url: Option<String>,
    /// Redis connection string for the session store.
    pub redis_url: Option<String>,
    /// Session lifetime in seconds.
    pub session_ttl_seconds: Option<u64>,
}

impl AppSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Session lifetime, defaulting to seven days.
    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_seconds {
            None => Ok(DEFAULT_SESSION_TTL),
            Some(0) => Err(SettingsError::ZeroSessionTtl),
            Some(seconds) => Ok(Duration::from_secs(seconds)),
        }
    }
}
