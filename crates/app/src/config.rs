//! Runtime configuration, read from the environment with an optional `.env`.

use std::time::Duration;

use services::DEFAULT_MAX_QUESTIONS;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub max_questions: usize,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_questions: DEFAULT_MAX_QUESTIONS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Load from the process environment, after reading `.env` if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but unusable.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable source. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when a variable is set but unusable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("API_URL") {
            config.api_url = parse_url("API_URL", &url)?;
        }
        if let Some(raw) = lookup("API_TIMEOUT") {
            config.timeout = Duration::from_secs(parse_positive("API_TIMEOUT", &raw)?);
        }
        if let Some(raw) = lookup("MAX_QUESTIONS") {
            config.max_questions = usize::try_from(parse_positive("MAX_QUESTIONS", &raw)?)
                .map_err(|e| ConfigError::InvalidValue("MAX_QUESTIONS", e.to_string()))?;
        }
        if let Some(filter) = lookup("RUST_LOG").filter(|f| !f.trim().is_empty()) {
            config.log_filter = filter;
        }
        Ok(config)
    }
}

pub fn parse_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.trim_end_matches('/').to_string())
    } else {
        Err(ConfigError::InvalidValue(
            name,
            format!("'{raw}' is not an http(s) URL"),
        ))
    }
}

pub fn parse_positive(name: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(ConfigError::InvalidValue(name, "must be greater than zero".into())),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue(name, format!("'{raw}': {e}"))),
    }
}
