//! Core error types for randfocus-core.
//!
//! Errors are split by layer: the key-value backend reports [`StoreError`],
//! the TOML config layer reports [`ConfigError`] on its own, and everything the
//! session controller can return is folded into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for randfocus-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence backend errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Serialization errors when encoding state for the store
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A session is already running; stop it before starting another.
    #[error("A focus session is already running (started at {started_at})")]
    AlreadyActive { started_at: i64 },

    /// The operation needs an active session and there is none.
    #[error("No active focus session")]
    NoActiveSession,
}

/// Key-value backend errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the config tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseBusy
                    || e.code == rusqlite::ErrorCode::DatabaseLocked
                {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn already_active_message_mentions_start() {
        let err = CoreError::AlreadyActive { started_at: 42 };
        assert!(err.to_string().contains("started at 42"));
    }

    #[test]
    fn store_error_wraps_into_core() {
        let err: CoreError = StoreError::Locked.into();
        assert!(matches!(err, CoreError::Store(StoreError::Locked)));
        assert_eq!(err.to_string(), "Storage error: Store is locked");
    }

    #[test]
    fn busy_sqlite_maps_to_locked() {
        let raw = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(StoreError::from(raw), StoreError::Locked));
    }
}
