//! Configuration management for the EventEase state layer.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first if a `.env` file should be honoured.

use eventease_client::{ClientConfig, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `EVENTEASE_API_URL` is not an absolute URL
    #[error("Invalid API URL {0:?}: expected an absolute http(s) URL")]
    InvalidApiUrl(String),

    /// `EVENTEASE_METRICS_ADDR` is not a socket address
    #[error("Invalid metrics address {0:?}")]
    InvalidMetricsAddr(String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEaseConfig {
    /// Backend connection
    pub api: ApiConfig,
    /// Session handling
    pub session: SessionConfig,
    /// Store runtime and observability
    pub runtime: RuntimeConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root (default: `http://localhost:5000/api`)
    pub base_url: String,
    /// Per-request timeout (default: 30s)
    pub request_timeout: Duration,
    /// Optional `User-Agent` header
    pub user_agent: Option<String>,
}

/// Session handling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Clear the local user even when `POST /auth/logout` fails
    ///
    /// Default: `false` (a failed logout keeps the user signed in locally and
    /// reports `"Logout failed"`).
    pub clear_session_on_logout_failure: bool,
}

/// Store runtime and observability settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Log filter directives (default: `eventease=info,eventease_client=info`)
    pub log_filter: String,
    /// How long shutdown waits for in-flight requests (default: 5s)
    pub shutdown_timeout: Duration,
    /// Prometheus scrape address; metrics are disabled when unset
    pub metrics_addr: Option<SocketAddr>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_filter: "eventease=info,eventease_client=info".to_string(),
            shutdown_timeout: Duration::from_secs(5),
            metrics_addr: None,
        }
    }
}

impl EventEaseConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API URL or metrics address is malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    ///
    /// Unparseable numbers and booleans fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API URL or metrics address is malformed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let seconds = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_secs)
        };

        let base_url = lookup("EVENTEASE_API_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api.base_url);
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::InvalidApiUrl(base_url));
        }

        let metrics_addr = match lookup("EVENTEASE_METRICS_ADDR").filter(|s| !s.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse::<SocketAddr>()
                    .map_err(|_| ConfigError::InvalidMetricsAddr(raw))?,
            ),
            None => None,
        };

        Ok(Self {
            api: ApiConfig {
                base_url,
                request_timeout: seconds("EVENTEASE_REQUEST_TIMEOUT_SECS", defaults.api.request_timeout),
                user_agent: lookup("EVENTEASE_USER_AGENT").filter(|s| !s.trim().is_empty()),
            },
            session: SessionConfig {
                clear_session_on_logout_failure: lookup("EVENTEASE_CLEAR_SESSION_ON_LOGOUT_FAILURE")
                    .and_then(|s| parse_flag(&s))
                    .unwrap_or(defaults.session.clear_session_on_logout_failure),
            },
            runtime: RuntimeConfig {
                log_filter: lookup("RUST_LOG")
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or(defaults.runtime.log_filter),
                shutdown_timeout: seconds(
                    "EVENTEASE_SHUTDOWN_TIMEOUT_SECS",
                    defaults.runtime.shutdown_timeout,
                ),
                metrics_addr,
            },
        })
    }

    /// Settings for [`eventease_client::ApiClient`]
    #[must_use]
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: self.api.request_timeout,
            user_agent: self.api.user_agent.clone(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<EventEaseConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        EventEaseConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = load(&[]).unwrap();
        assert_eq!(config, EventEaseConfig::default());
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert!(!config.session.clear_session_on_logout_failure);
        assert_eq!(config.runtime.metrics_addr, None);
    }

    #[test]
    fn reads_overrides() {
        let config = load(&[
            ("EVENTEASE_API_URL", "https://api.eventease.test/api"),
            ("EVENTEASE_REQUEST_TIMEOUT_SECS", "10"),
            ("EVENTEASE_USER_AGENT", "eventease-cli/0.1"),
            ("EVENTEASE_CLEAR_SESSION_ON_LOGOUT_FAILURE", "yes"),
            ("EVENTEASE_SHUTDOWN_TIMEOUT_SECS", "2"),
            ("EVENTEASE_METRICS_ADDR", "127.0.0.1:9100"),
            ("RUST_LOG", "debug"),
        ])
        .unwrap();

        assert_eq!(config.api.base_url, "https://api.eventease.test/api");
        assert_eq!(config.api.request_timeout, Duration::from_secs(10));
        assert_eq!(config.api.user_agent.as_deref(), Some("eventease-cli/0.1"));
        assert!(config.session.clear_session_on_logout_failure);
        assert_eq!(config.runtime.shutdown_timeout, Duration::from_secs(2));
        assert_eq!(config.runtime.metrics_addr, Some("127.0.0.1:9100".parse().unwrap()));
        assert_eq!(config.runtime.log_filter, "debug");

        let client = config.client_config();
        assert_eq!(client.timeout, Duration::from_secs(10));
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let config = load(&[
            ("EVENTEASE_REQUEST_TIMEOUT_SECS", "soon"),
            ("EVENTEASE_CLEAR_SESSION_ON_LOGOUT_FAILURE", "maybe"),
        ])
        .unwrap();
        assert_eq!(config.api.request_timeout, Duration::from_secs(30));
        assert!(!config.session.clear_session_on_logout_failure);
    }

    #[test]
    fn rejects_bad_url_and_addr() {
        assert_eq!(
            load(&[("EVENTEASE_API_URL", "localhost:5000")]),
            Err(ConfigError::InvalidApiUrl("localhost:5000".to_string()))
        );
        assert!(matches!(
            load(&[("EVENTEASE_METRICS_ADDR", "port 9100")]),
            Err(ConfigError::InvalidMetricsAddr(_))
        ));
    }
}
