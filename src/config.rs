//! Application configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8090";
pub const DEFAULT_SESSION_KEY: &str = "pb_auth";
pub const DEFAULT_FEED_PAGE_SIZE: u32 = 20;
pub const DEFAULT_MY_POSTS_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(String),
}

impl ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        "E_CONFIG_PARSE"
    }
}

/// Where and how to reach the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub base_url: String,
    /// `None` leaves the HTTP stack's default in place.
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_BASE_URL.to_owned(), request_timeout: None, connect_timeout: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub session_key: String,
    /// File backing the session slot; `None` keeps the session in memory.
    pub session_file: Option<PathBuf>,
    pub feed_page_size: u32,
    pub my_posts_page_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            session_key: DEFAULT_SESSION_KEY.to_owned(),
            session_file: None,
            feed_page_size: DEFAULT_FEED_PAGE_SIZE,
            my_posts_page_size: DEFAULT_MY_POSTS_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    /// Load `.env` if present, then read the environment.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, ".env could not be read");
            }
        }
        Self::from_env()
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `POSTBOARD_URL`: backend root, default `http://127.0.0.1:8090`
    /// - `POSTBOARD_SESSION_KEY`: storage key, default `pb_auth`
    /// - `POSTBOARD_SESSION_FILE`: JSON file for the session slot
    /// - `POSTBOARD_REQUEST_TIMEOUT_SECS`, `POSTBOARD_CONNECT_TIMEOUT_SECS`
    /// - `POSTBOARD_FEED_PAGE_SIZE`: default 20
    /// - `POSTBOARD_MY_POSTS_PAGE_SIZE`: default 50
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for a non-http(s) URL or a malformed number.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(env_string("POSTBOARD_URL").as_deref())?;
        let backend = BackendConfig {
            base_url,
            request_timeout: env_secs("POSTBOARD_REQUEST_TIMEOUT_SECS")?,
            connect_timeout: env_secs("POSTBOARD_CONNECT_TIMEOUT_SECS")?,
        };
        Ok(Self {
            backend,
            session_key: env_string("POSTBOARD_SESSION_KEY").unwrap_or_else(|| DEFAULT_SESSION_KEY.to_owned()),
            session_file: env_string("POSTBOARD_SESSION_FILE").map(PathBuf::from),
            feed_page_size: env_parse("POSTBOARD_FEED_PAGE_SIZE", DEFAULT_FEED_PAGE_SIZE)?,
            my_posts_page_size: env_parse("POSTBOARD_MY_POSTS_PAGE_SIZE", DEFAULT_MY_POSTS_PAGE_SIZE)?,
        })
    }
}

/// Non-empty, trimmed value of `key`.
fn env_string(key: &str) -> Option<String> {
    let Ok(raw) = std::env::var(key) else {
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

fn env_parse<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match env_string(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| ConfigError::Parse(format!("{key}: expected a number, got '{raw}'"))),
    }
}

fn env_secs(key: &str) -> Result<Option<Duration>, ConfigError> {
    match env_string(key) {
        None => Ok(None),
        Some(_) => Ok(Some(Duration::from_secs(env_parse::<u64>(key, 0)?))),
    }
}

fn parse_base_url(raw: Option<&str>) -> Result<String, ConfigError> {
    let url = raw.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::Parse(format!("POSTBOARD_URL must be http(s), got '{url}'")));
    }
    Ok(url.to_owned())
}
