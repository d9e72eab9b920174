//! Endpoint configuration.
//!
//! Defaults are the fixed devnet and local prediction endpoints. Each can be
//! overridden from the environment:
//!
//! - `PNODE_DIRECTORY_RPC`: cluster RPC endpoint (default: `https://api.devnet.xandeum.com:8899`)
//! - `PNODE_PREDICTION_URL`: prediction service base URL (default: `http://localhost:8001`)
//! - `PNODE_HTTP_TIMEOUT_SECS`: per-request timeout (default: none)

use std::time::Duration;

use thiserror::Error;

/// Devnet cluster RPC endpoint.
pub const DEFAULT_DIRECTORY_RPC: &str = "https://api.devnet.xandeum.com:8899";

/// Local prediction service.
pub const DEFAULT_PREDICTION_URL: &str = "http://localhost:8001";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must start with http:// or https://, got '{value}'")]
    Scheme { field: &'static str, value: String },

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("PNODE_HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{value}'")]
    InvalidTimeout { value: String },
}

/// Endpoints used by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub directory_rpc_url: String,
    pub prediction_url: String,
    /// `None` leaves requests without a client-side deadline.
    pub request_timeout_secs: Option<u64>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            directory_rpc_url: DEFAULT_DIRECTORY_RPC.to_string(),
            prediction_url: DEFAULT_PREDICTION_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl DashboardConfig {
    /// Builds a config from environment variables, falling back to defaults.
    /// A timeout that is set but not a number is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let request_timeout_secs = match lookup("PNODE_HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidTimeout { value: raw.clone() })?,
            ),
            None => None,
        };

        Ok(Self {
            directory_rpc_url: lookup("PNODE_DIRECTORY_RPC")
                .unwrap_or(defaults.directory_rpc_url),
            prediction_url: lookup("PNODE_PREDICTION_URL").unwrap_or(defaults.prediction_url),
            request_timeout_secs,
        })
    }

    /// Checks that both endpoints are usable HTTP URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("directory_rpc_url", &self.directory_rpc_url)?;
        check_url("prediction_url", &self.prediction_url)?;
        if self.request_timeout_secs == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::Scheme {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}
