//! Configuration management for the client.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default remote snapshot endpoint.
pub const DEFAULT_SERVER_URL: &str = "https://jsonplaceholder.typicode.com/posts";

const DEFAULT_SYNC_INTERVAL_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote data source endpoint (read and write)
    pub server_url: String,
    /// Interval between periodic sync cycles
    pub sync_interval: Duration,
    /// Directory holding the persisted collection and sync metadata
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_url =
            env::var("QUOTESYNC_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());

        let sync_interval = match env::var("QUOTESYNC_SYNC_INTERVAL_SECS") {
            Ok(raw) => parse_interval(&raw)?,
            Err(_) => Duration::from_secs(DEFAULT_SYNC_INTERVAL_SECS),
        };

        let data_dir = match env::var("QUOTESYNC_DATA_DIR") {
            Ok(raw) => PathBuf::from(raw),
            Err(_) => default_data_dir().ok_or(ConfigError::NoDataDir)?,
        };

        Ok(Self {
            server_url,
            sync_interval,
            data_dir,
        })
    }
}

fn parse_interval(raw: &str) -> Result<Duration, ConfigError> {
    match raw.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidSyncInterval),
    }
}

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|base| base.join("quotesync"))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("QUOTESYNC_SYNC_INTERVAL_SECS must be a positive number of seconds")]
    InvalidSyncInterval,

    #[error("Could not determine a data directory; set QUOTESYNC_DATA_DIR")]
    NoDataDir,
}
