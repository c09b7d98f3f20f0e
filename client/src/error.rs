//! Unified error handling for the client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type.
///
/// No error here is fatal to the process: failure paths leave the
/// in-memory collection at its last consistent state, and the caller
/// decides what to report.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Engine error: {0}")]
    Engine(#[from] quotesync_engine::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
