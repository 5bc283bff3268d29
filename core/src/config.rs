//! Connection parameters for `RemoteDataSource`.

use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Pause before `GET /users` so the loading state stays visible.
    pub users_delay: Duration,
    /// Pause before `GET /todos`.
    pub todos_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            users_delay: Duration::from_millis(300),
            todos_delay: Duration::from_millis(500),
        }
    }
}

impl Config {
    /// Defaults, overridden by `TODOS_BASE_URL`, `TODOS_TIMEOUT_SECS` and
    /// `TODOS_LOADING_DELAY_MS` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup("TODOS_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = number(&lookup, "TODOS_TIMEOUT_SECS")? {
            config.connect_timeout = Duration::from_secs(secs);
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = number(&lookup, "TODOS_LOADING_DELAY_MS")? {
            config.users_delay = Duration::from_millis(ms);
            config.todos_delay = Duration::from_millis(ms);
        }
        Ok(config)
    }

    /// Point at `base_url` with no loading delays. Handy against a local server.
    pub fn immediate(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            users_delay: Duration::ZERO,
            todos_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn number(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
    }
}
