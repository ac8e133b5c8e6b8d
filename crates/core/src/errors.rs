//! Core error types for foliobot.
//!
//! Quote fetch failures are not errors at this level: the report service
//! turns them into unavailable holdings. What reaches [`Error`] is either a
//! configuration problem or a broken snapshot file, and both stop the run.

use std::path::PathBuf;

use thiserror::Error;

use foliobot_market_data::MarketDataError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for foliobot.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to load configuration: {0}")]
    ConfigIO(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] MarketDataError),

    #[error("Snapshot store error: {0}")]
    Snapshot(#[from] SnapshotError),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors raised by the snapshot store.
///
/// A missing file is not an error (first run); everything below is.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write snapshot {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfigValue(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
