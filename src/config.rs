//! Server configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5048;

/// Errors produced while reading server configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid PORT: {0:?}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// JSON file backing the settings record. In-memory only when `None`.
    pub settings_file: Option<PathBuf>,
    /// NewsAPI key. The feed serves a setup notice when `None`.
    pub newsapi_key: Option<String>,
    /// NewsAPI base URL override; the public endpoint when `None`.
    pub newsapi_base_url: Option<String>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: listen port, default 5048
    /// - `SETTINGS_FILE`: path of the JSON file that persists settings
    /// - `NEWSAPI_KEY`: key for the news feed
    /// - `NEWSAPI_BASE_URL`: news provider base URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `PORT` is not a valid port.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_port(std::env::var("PORT").ok().as_deref())?;
        let settings_file = parse_settings_file(std::env::var("SETTINGS_FILE").ok().as_deref());
        let newsapi_key = parse_optional(std::env::var("NEWSAPI_KEY").ok().as_deref());
        let newsapi_base_url = parse_optional(std::env::var("NEWSAPI_BASE_URL").ok().as_deref());
        Ok(Self { port, settings_file, newsapi_key, newsapi_base_url })
    }
}

fn parse_port(raw: Option<&str>) -> Result<u16, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(DEFAULT_PORT),
        Some(value) => value
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort(value.to_owned())),
    }
}

fn parse_settings_file(raw: Option<&str>) -> Option<PathBuf> {
    parse_optional(raw).map(PathBuf::from)
}

fn parse_optional(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
