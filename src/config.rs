//! Gateway configuration from the environment

use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_NONCE_LIFETIME: Duration = Duration::from_secs(86_400);
const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid port number, got {value:?}")]
    InvalidPort { var: &'static str, value: String },
    #[error("{var} must be a whole number of seconds greater than zero, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the external RAG service
    pub api_url: String,
    pub port: u16,
    /// Base URL clients use to reach this gateway
    pub public_url: String,
    /// Nonce key; `None` means generate one per process
    pub nonce_secret: Option<String>,
    pub nonce_lifetime: Duration,
    pub upstream_timeout: Duration,
    /// Bearer token required on the content hook, if set
    pub hook_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            port: DEFAULT_PORT,
            public_url: format!("http://localhost:{DEFAULT_PORT}"),
            nonce_secret: None,
            nonce_lifetime: DEFAULT_NONCE_LIFETIME,
            upstream_timeout: DEFAULT_UPSTREAM_TIMEOUT,
            hook_token: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let api_url = match get("RAG_CHATBOT_API_URL") {
            Some(url) => validate_url("RAG_CHATBOT_API_URL", url)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let port = match get("RAG_CHATBOT_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort {
                    var: "RAG_CHATBOT_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };

        let public_url = match get("RAG_CHATBOT_PUBLIC_URL") {
            Some(url) => validate_url("RAG_CHATBOT_PUBLIC_URL", url)?,
            None => format!("http://localhost:{port}"),
        };

        let nonce_lifetime = match get("RAG_CHATBOT_NONCE_LIFETIME_SECS") {
            Some(value) => parse_secs("RAG_CHATBOT_NONCE_LIFETIME_SECS", value)?,
            None => DEFAULT_NONCE_LIFETIME,
        };

        let upstream_timeout = match get("RAG_CHATBOT_UPSTREAM_TIMEOUT_SECS") {
            Some(value) => parse_secs("RAG_CHATBOT_UPSTREAM_TIMEOUT_SECS", value)?,
            None => DEFAULT_UPSTREAM_TIMEOUT,
        };

        Ok(Self {
            api_url,
            port,
            public_url,
            nonce_secret: get("RAG_CHATBOT_NONCE_SECRET"),
            nonce_lifetime,
            upstream_timeout,
            hook_token: get("RAG_CHATBOT_HOOK_TOKEN"),
        })
    }

    /// Where browsers and clients post chat queries
    pub fn ajax_url(&self) -> String {
        format!("{}{}", self.public_url, crate::api::AJAX_PATH)
    }
}

fn validate_url(var: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_string())
    } else {
        Err(ConfigError::InvalidUrl { var, value })
    }
}

/// Parse a positive number of seconds
pub fn parse_secs(var: &'static str, value: String) -> Result<Duration, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidDuration { var, value }),
    }
}
