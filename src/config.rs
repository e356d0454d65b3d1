//! Console configuration: service URL, request timeout and log directory.
//!
//! Layered lowest to highest: built-in defaults, `VOLTSTOCK_*` environment
//! variables, then command line flags (applied by the caller through
//! [`ConsoleConfig::with_overrides`]).

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::api::{normalize_api_url, DEFAULT_TIMEOUT};
use crate::logging;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_API_URL: &str = "VOLTSTOCK_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "VOLTSTOCK_TIMEOUT_SECS";
pub const ENV_LOG_DIR: &str = "VOLTSTOCK_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{ENV_TIMEOUT_SECS} must be a positive number of seconds, got {0:?}")]
    InvalidTimeout(String),
    #[error("API URL must not be empty")]
    EmptyApiUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Normalized service base URL, no trailing slash or `/api`.
    pub api_url: String,
    pub timeout: Duration,
    pub log_dir: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            log_dir: logging::default_log_dir(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout(raw.to_string())),
    }
}

impl ConsoleConfig {
    /// Defaults overlaid with whatever `VOLTSTOCK_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = env_value(ENV_API_URL) {
            config.api_url = normalize_api_url(&url);
        }
        if let Some(raw) = env_value(ENV_TIMEOUT_SECS) {
            config.timeout = parse_timeout(&raw)?;
        }
        if let Some(dir) = env_value(ENV_LOG_DIR) {
            config.log_dir = PathBuf::from(dir);
        }
        Ok(config)
    }

    /// Apply command line flags on top.
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = api_url {
            if url.trim().is_empty() {
                return Err(ConfigError::EmptyApiUrl);
            }
            self.api_url = normalize_api_url(url);
        }
        if let Some(secs) = timeout_secs {
            self.timeout = parse_timeout(&secs.to_string())?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [ENV_API_URL, ENV_TIMEOUT_SECS, ENV_LOG_DIR] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        clear_env();
        let config = ConsoleConfig::from_env().unwrap();
        assert_eq!(config.api_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    #[serial]
    fn env_overrides_defaults() {
        clear_env();
        std::env::set_var(ENV_API_URL, "inventory.example.com/api/");
        std::env::set_var(ENV_TIMEOUT_SECS, "5");
        std::env::set_var(ENV_LOG_DIR, "/tmp/voltstock-logs");
        let config = ConsoleConfig::from_env().unwrap();
        clear_env();
        assert_eq!(config.api_url, "https://inventory.example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/voltstock-logs"));
    }

    #[test]
    #[serial]
    fn bad_timeout_is_rejected() {
        clear_env();
        std::env::set_var(ENV_TIMEOUT_SECS, "soon");
        let err = ConsoleConfig::from_env().unwrap_err();
        clear_env();
        assert_eq!(err, ConfigError::InvalidTimeout("soon".into()));
    }

    #[test]
    fn flags_win_over_env() {
        let config = ConsoleConfig::default()
            .with_overrides(Some("localhost:9000"), Some(3))
            .unwrap();
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.timeout, Duration::from_secs(3));

        assert_eq!(
            ConsoleConfig::default().with_overrides(Some(" "), None),
            Err(ConfigError::EmptyApiUrl)
        );
        assert!(ConsoleConfig::default().with_overrides(None, Some(0)).is_err());
    }
}
