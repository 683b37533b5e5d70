pub mod config;
pub mod data;
pub mod decision;
pub mod habit;
pub mod pause;
pub mod stats;

use std::sync::Arc;

use mindpause_core::storage::StateStore;
use mindpause_core::{
    Config, CoreError, MemoryStore, RecordLedger, SqliteStore, StoreBackend, SystemClock,
};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Open the ledger on the store the config selects.
pub fn open_ledger(config: &Config) -> Result<Arc<RecordLedger>, CoreError> {
    let store: Arc<dyn StateStore> = match config.storage.backend {
        StoreBackend::Sqlite => Arc::new(SqliteStore::open()?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    let ledger = RecordLedger::open_with_key(store, Arc::new(SystemClock), &config.storage.state_key)?;
    Ok(Arc::new(ledger))
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
