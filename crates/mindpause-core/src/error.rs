//! Core error types for mindpause-core.
//!
//! Every fallible operation in the library surfaces one of these variants.
//! None of them are fatal: callers decide how to render or retry.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for mindpause-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Input rejected before any state was touched
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Operation not allowed in the current state
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// No pause record with the given id
    #[error("Pause record not found: {id}")]
    NotFound { id: String },

    /// No habit with the given id
    #[error("Habit not found: {id}")]
    HabitNotFound { id: String },

    /// Store read/write failed; in-memory state was left untouched
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Store-specific errors.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the backing store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The store refused or could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Reading the blob failed
    #[error("Failed to read '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing or removing the blob failed
    #[error("Failed to write '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// Blob could not be encoded or decoded
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database is locked by another process
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Decision text is empty after trimming
    #[error("Decision text must not be empty")]
    EmptyDecision,

    /// Habit name is empty after trimming
    #[error("Habit name must not be empty")]
    EmptyHabitName,

    /// A concluded pause must be exactly one of completed / exited early
    #[error("Invalid pause outcome: completed={completed}, exited_early={exited_early}")]
    InvalidOutcome { completed: bool, exited_early: bool },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                PersistenceError::Locked
            }
            _ => PersistenceError::Unavailable(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Persistence(PersistenceError::Serialization(err))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_converts_into_core_error() {
        let err: CoreError = ValidationError::EmptyDecision.into();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyDecision)));
        assert_eq!(err.to_string(), "Validation error: Decision text must not be empty");
    }

    #[test]
    fn json_error_is_a_persistence_error() {
        let bad = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = bad.into();
        assert!(matches!(
            err,
            CoreError::Persistence(PersistenceError::Serialization(_))
        ));
    }

    #[test]
    fn not_found_mentions_id() {
        let err = CoreError::NotFound { id: "42".into() };
        assert!(err.to_string().contains("42"));
    }
}
