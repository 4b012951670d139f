//! Application configuration for the rentals admin.
//!
//! Settings are read from a small JSON file (`~/.config/rentals/config.json`
//! on most platforms, or the path in `RENTALS_CONFIG_PATH`) and then
//! overridden by environment variables. A missing file yields defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::expand_tilde;

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "RENTALS_CONFIG_PATH";
/// Environment variable overriding the rentals service base URL.
pub const API_BASE_ENV: &str = "RENTALS_API_BASE";
/// Environment variable supplying the rentals service bearer token.
pub const API_TOKEN_ENV: &str = "RENTALS_API_TOKEN";

pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = "rentals.log";
const APP_DIR_NAME: &str = "rentals";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";

/// Error surfaced when loading configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Persisted configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the rentals service (no trailing slash required).
    pub api_base_url: String,
    /// Bearer token sent with every request, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Whether the sidebar starts expanded.
    pub sidebar_open: bool,
    /// How long a toast notification stays visible.
    pub toast_ttl_ms: u64,
    /// Per-request timeout for the rentals service.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            sidebar_open: true,
            toast_ttl_ms: 5_000,
            request_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Loads the config file at the default location and applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Loads the config file at `path` and applies environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = read_config_file(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Applies `RENTALS_API_BASE` and `RENTALS_API_TOKEN` when set and non-empty.
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = non_empty_env(API_BASE_ENV) {
            self.api_base_url = base_url;
        }
        if let Some(token) = non_empty_env(API_TOKEN_ENV) {
            self.api_token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_base_url",
                reason: "must not be empty".into(),
            });
        }
        if self.toast_ttl_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "toast_ttl_ms",
                reason: "must be greater than zero".into(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "request_timeout_secs",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    pub fn toast_ttl(&self) -> Duration {
        Duration::from_millis(self.toast_ttl_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Resolves the config file path, honoring `RENTALS_CONFIG_PATH`.
pub fn default_config_path() -> PathBuf {
    if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
        return expand_tilde(&path);
    }
    app_config_dir().join(CONFIG_FILE_NAME)
}

/// Default location of the log file written while the TUI owns the terminal.
pub fn default_log_path() -> PathBuf {
    app_config_dir().join(LOG_FILE_NAME)
}

fn app_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn read_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(data) => {
            debug!(path = %path.display(), "loaded config file");
            Ok(serde_json::from_str(&data)?)
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(AppConfig::default())
        }
        Err(error) => {
            warn!(path = %path.display(), error = %error, "failed to read config file");
            Err(ConfigError::Io(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn without_env_overrides<F: FnOnce()>(f: F) {
        temp_env::with_vars_unset([API_BASE_ENV, API_TOKEN_ENV, CONFIG_PATH_ENV], f);
    }

    #[test]
    fn missing_file_yields_defaults() {
        without_env_overrides(|| {
            let dir = tempfile::tempdir().unwrap();
            let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
            assert_eq!(config, AppConfig::default());
        });
    }

    #[test]
    fn file_values_fill_in_over_defaults() {
        without_env_overrides(|| {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"api_base_url": "http://127.0.0.1:8080", "sidebar_open": false}}"#).unwrap();

            let config = AppConfig::load_from(file.path()).unwrap();
            assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
            assert!(!config.sidebar_open);
            assert_eq!(config.toast_ttl_ms, 5_000);
        });
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api_base_url": "http://127.0.0.1:8080"}}"#).unwrap();

        temp_env::with_vars(
            [
                (API_BASE_ENV, Some("https://rentals.example.com")),
                (API_TOKEN_ENV, Some("secret-token")),
            ],
            || {
                let config = AppConfig::load_from(file.path()).unwrap();
                assert_eq!(config.api_base_url, "https://rentals.example.com");
                assert_eq!(config.api_token.as_deref(), Some("secret-token"));
            },
        );
    }

    #[test]
    fn zero_toast_ttl_is_rejected() {
        without_env_overrides(|| {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, r#"{{"toast_ttl_ms": 0}}"#).unwrap();

            let error = AppConfig::load_from(file.path()).unwrap_err();
            assert!(matches!(error, ConfigError::Invalid { field: "toast_ttl_ms", .. }));
        });
    }

    #[test]
    fn malformed_file_is_a_serialization_error() {
        without_env_overrides(|| {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            write!(file, "not json").unwrap();

            let error = AppConfig::load_from(file.path()).unwrap_err();
            assert!(matches!(error, ConfigError::Serialization(_)));
        });
    }

    #[test]
    fn config_path_env_is_honored() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/tmp/rentals-test/config.json"), || {
            assert_eq!(default_config_path(), PathBuf::from("/tmp/rentals-test/config.json"));
        });
    }
}
