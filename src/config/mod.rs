//! Configuration management.
//!
//! Every setting resolves in the same order:
//! 1. CLI flag (clap also fills flags from `WIKISYNC_*` environment variables)
//! 2. Config file (`--config`, `WIKISYNC_CONFIG`, or `~/.wikisync/config.json`)
//! 3. Built-in default
//!
//! The password is only accepted from the flag or its environment variable,
//! never from the config file.

use crate::error::{Error, Result};
use crate::wiki::Credentials;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default content directory, relative to the working directory.
pub const DEFAULT_CONTENT_DIR: &str = "internal-wiki/content";

/// Default watch interval in seconds.
pub const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Settings read from the optional JSON config file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub url: Option<String>,
    pub username: Option<String>,
    pub content_dir: Option<PathBuf>,
    pub interval_secs: Option<u64>,
}

/// Get the global config directory (`~/.wikisync/`).
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".wikisync"))
}

/// Get the default config file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.json"))
}

/// Load the config file.
///
/// An explicit path must exist. The default path is optional: when it is
/// absent an empty config is returned.
///
/// # Errors
///
/// Returns `Error::Config` if the file cannot be read or parsed.
pub fn load_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

/// Pick the first non-empty value.
fn first_non_empty(flag: Option<&str>, file: Option<&str>) -> Option<String> {
    flag.into_iter()
        .chain(file)
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(String::from)
}

/// Resolve wiki credentials.
///
/// # Errors
///
/// Returns `Error::Config` naming the flag and variable of the first
/// missing setting.
pub fn resolve_credentials(
    url: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    file: &FileConfig,
) -> Result<Credentials> {
    let endpoint = first_non_empty(url, file.url.as_deref()).ok_or_else(|| {
        Error::Config("wiki URL not set (use --url or WIKISYNC_URL)".to_string())
    })?;

    let username = first_non_empty(username, file.username.as_deref()).ok_or_else(|| {
        Error::Config("username not set (use --username or WIKISYNC_USERNAME)".to_string())
    })?;

    // Passwords may legitimately contain surrounding spaces; only reject empty.
    let secret = password
        .filter(|p| !p.is_empty())
        .map(String::from)
        .ok_or_else(|| {
            Error::Config("password not set (use --password or WIKISYNC_PASSWORD)".to_string())
        })?;

    Ok(Credentials::new(endpoint, username, secret))
}

/// Resolve the content directory.
#[must_use]
pub fn resolve_content_dir(flag: Option<&Path>, file: &FileConfig) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| file.content_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_DIR))
}

/// Resolve the watch interval.
///
/// # Errors
///
/// Returns `Error::Config` for an interval of zero.
pub fn resolve_interval(flag: Option<u64>, file: &FileConfig) -> Result<Duration> {
    let secs = flag
        .or(file.interval_secs)
        .unwrap_or(DEFAULT_INTERVAL_SECS);
    if secs == 0 {
        return Err(Error::Config(
            "watch interval must be at least 1 second".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}
