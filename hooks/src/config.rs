use payloads::api_client::{DEFAULT_API_PREFIX, DEFAULT_TIMEOUT};
use std::time::Duration;

use crate::contexts::toast::DEFAULT_TOAST_DURATION;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive whole number, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("BACKEND_URL must start with http:// or https://, got {0:?}")]
    InvalidBackendUrl(String),
}

/// Client-side settings.
///
/// Environment variables can be set directly or loaded from a .env file:
/// - BACKEND_URL: origin of the backend (default http://127.0.0.1:8000)
/// - API_PREFIX: path prefix of every endpoint (default /api)
/// - REQUEST_TIMEOUT_SECS: overall timeout of one request (default 30)
/// - POLL_INTERVAL_SECS: refresh interval for polling hooks; unset or 0
///   disables polling
/// - TOAST_DURATION_MS: auto-dismiss delay for toasts (default 5000)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub api_prefix: String,
    pub request_timeout: Duration,
    pub poll_interval: Option<Duration>,
    pub toast_duration: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8000".to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            poll_interval: None,
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Unset variables keep their defaults.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(url) = lookup("BACKEND_URL") {
            let url = url.trim().trim_end_matches('/').to_string();
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::InvalidBackendUrl(url));
            }
            config.backend_url = url;
        }
        if let Some(prefix) = lookup("API_PREFIX") {
            let prefix = prefix.trim().trim_end_matches('/');
            config.api_prefix = if prefix.starts_with('/') || prefix.is_empty()
            {
                prefix.to_string()
            } else {
                format!("/{prefix}")
            };
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT_SECS") {
            let secs = parse_number("REQUEST_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::InvalidNumber {
                    name: "REQUEST_TIMEOUT_SECS",
                    value: secs.to_string(),
                });
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            let secs = parse_number("POLL_INTERVAL_SECS", &secs)?;
            config.poll_interval =
                (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(ms) = lookup("TOAST_DURATION_MS") {
            config.toast_duration =
                Duration::from_millis(parse_number("TOAST_DURATION_MS", &ms)?);
        }

        Ok(config)
    }
}

fn parse_number(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}
