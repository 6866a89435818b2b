//! Runtime configuration
//!
//! Built once at startup from the process environment (after `.env` has been
//! loaded) and passed by reference to every component.

use std::env;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_RETRY_SECS: u64 = 600;
const DEFAULT_ERROR_RETRY_SECS: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const REQUIRED_VARS: [&str; 3] = ["PRACTICUM_TOKEN", "TELEGRAM_TOKEN", "TELEGRAM_CHAT_ID"];

/// Fatal startup problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),
}

/// Everything the bot reads from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: String,
    pub telegram_api_url: String,
    pub retry_interval: Duration,
    pub error_retry_interval: Duration,
    pub request_timeout: Duration,
    pub forward_errors: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = missing_tokens(&lookup);
        if !missing.is_empty() {
            return Err(ConfigError::MissingCredentials(missing));
        }

        let required = |key: &str| lookup(key).unwrap_or_default();
        let secs = |key: &str, default: u64| {
            Duration::from_secs(
                lookup(key)
                    .and_then(|val| val.trim().parse::<u64>().ok())
                    .unwrap_or(default),
            )
        };

        Ok(Self {
            practicum_token: required("PRACTICUM_TOKEN"),
            telegram_token: required("TELEGRAM_TOKEN"),
            telegram_chat_id: required("TELEGRAM_CHAT_ID"),
            endpoint: lookup("PRACTICUM_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            telegram_api_url: lookup("TELEGRAM_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string()),
            retry_interval: secs("RETRY_TIME", DEFAULT_RETRY_SECS),
            error_retry_interval: secs("ERROR_RETRY_TIME", DEFAULT_ERROR_RETRY_SECS),
            request_timeout: secs("REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS),
            forward_errors: lookup("FORWARD_ERRORS")
                .map(|val| matches!(val.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
                .unwrap_or(false),
        })
    }
}

/// Log every absent credential and return their names. Empty means all set.
pub fn missing_tokens<F>(lookup: &F) -> Vec<&'static str>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = Vec::new();
    for key in REQUIRED_VARS {
        let present = lookup(key).map(|val| !val.trim().is_empty()).unwrap_or(false);
        if !present {
            tracing::error!(variable = key, "Missing required environment variable");
            missing.push(key);
        }
    }
    missing
}
