//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Origin used when `SYSFREE_API_URL` is unset or empty.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Backend origin without a trailing slash.
    pub api_url: String,
    pub log_level: Level,
    /// JSON file persisting the session tokens; in-memory when `None`.
    pub token_store_path: Option<PathBuf>,
    pub login_path: String,
    pub debounce: Duration,
    /// Per-request timeout; the transport default applies when `None`.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Backend origin ---
        let api_url = var("SYSFREE_API_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "SYSFREE_API_URL".to_string(),
                format!("'{api_url}' is not an http(s) origin"),
            ));
        }

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Session and navigation ---
        let token_store_path = var("SYSFREE_TOKEN_STORE")
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let login_path = var("SYSFREE_LOGIN_PATH").unwrap_or_else(|| "/login".to_string());

        // --- Timings ---
        let debounce = Duration::from_millis(parse_number(&var, "SYSFREE_DEBOUNCE_MS")?.unwrap_or(500));
        let request_timeout =
            parse_number(&var, "SYSFREE_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);

        Ok(Self {
            api_url,
            log_level,
            token_store_path,
            login_path,
            debounce,
            request_timeout,
        })
    }
}

fn parse_number(var: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<u64>, ConfigError> {
    var(name)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
        })
        .transpose()
}
