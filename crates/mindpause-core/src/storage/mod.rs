mod config;
pub mod database;
pub mod memory;

pub use config::{Config, PauseConfig, StorageConfig, StoreBackend, MAX_PAUSE_DURATION_SECS};
pub use database::SqliteStore;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, PersistenceError};

/// Key the application state blob is stored under.
pub const STATE_KEY: &str = "mindPause_appState";

/// Raw key-value access to a single serialized blob.
///
/// Implementations only move strings; the ledger owns encoding and the
/// read-modify-write discipline.
pub trait StateStore: Send + Sync {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the value under `key`. Must not leave a partial write behind.
    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Returns `~/.config/mindpause[-dev]/`, or `$MINDPAUSE_HOME` when set.
///
/// Set MINDPAUSE_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("MINDPAUSE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MINDPAUSE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("mindpause-dev")
            } else {
                base_dir.join("mindpause")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
