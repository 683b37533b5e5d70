use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use super::StateStore;
use crate::error::PersistenceError;

/// In-memory store for tests and ephemeral sessions.
///
/// Can simulate write failures and slow writes to exercise the ledger's
/// write-through and serialization guarantees.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    simulate_write_error: AtomicBool,
    write_delay_ms: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a blob, as if written by an earlier run.
    pub fn with_entry(key: &str, blob: &str) -> Self {
        let store = Self::default();
        store.lock().insert(key.to_string(), blob.to_string());
        store
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Sleep this long inside every `set`.
    pub fn set_write_delay(&self, delay: Duration) {
        self.write_delay_ms
            .store(delay.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of successful `set`/`remove` calls.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_writable(&self, key: &str) -> Result<(), PersistenceError> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(PersistenceError::WriteFailed {
                key: key.to_string(),
                message: "simulated write error".to_string(),
            });
        }
        Ok(())
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        self.check_writable(key)?;
        let delay = self.write_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            std::thread::sleep(Duration::from_millis(delay as u64));
        }
        self.lock().insert(key.to_string(), blob.to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check_writable(key)?;
        self.lock().remove(key);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
