//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank variables behave as unset and fall back to defaults.
//! - `base_url` is an absolute http(s) origin without a trailing slash.

use crate::logging::{default_log_level, normalize_level};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::PathBuf;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "POETRYSTREAM_DB_PATH";
pub const ENV_BASE_URL: &str = "POETRYSTREAM_BASE_URL";
pub const ENV_LOG_LEVEL: &str = "POETRYSTREAM_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "POETRYSTREAM_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "poetrystream.sqlite3";
const DEFAULT_BASE_URL: &str = "http://localhost:3000";

static BASE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^/\s?#]+(/[^\s?#]*)?$").expect("valid base url regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("POETRYSTREAM_BASE_URL must be an absolute http(s) URL, got `{0}`")]
    InvalidBaseUrl(String),
    #[error("POETRYSTREAM_LOG_LEVEL: {0}")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub base_url: String,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its
    /// raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(ENV_DB_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let base_url = match read(ENV_BASE_URL) {
            Some(raw) => normalize_base_url(&raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(raw) => normalize_level(&raw).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            db_path,
            base_url,
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let stripped = raw.strip_suffix('/').unwrap_or(raw);
    if !BASE_URL_RE.is_match(stripped) {
        return Err(ConfigError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(stripped.to_string())
}
