//! SQLite-backed state store.
//!
//! Keeps the application blob in a single `kv` table, one row per key.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::{data_dir, StateStore};
use crate::error::{CoreError, PersistenceError};

/// SQLite database holding the application state blob.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database at `~/.config/mindpause/mindpause.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("mindpause.db");
        Ok(Self::open_path(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_path(path: &Path) -> Result<Self, PersistenceError> {
        let conn = Connection::open(path).map_err(|source| PersistenceError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, PersistenceError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, PersistenceError> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, PersistenceError> {
        self.conn
            .lock()
            .map_err(|_| PersistenceError::Unavailable("connection mutex poisoned".into()))
    }
}

fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}

impl StateStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT value FROM kv WHERE key = ?1")
            .map_err(|e| read_failed(key, e))?;
        match stmt.query_row(params![key], |row| row.get::<_, String>(0)) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(read_failed(key, e)),
        }
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), PersistenceError> {
        self.conn()?
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                params![key, blob],
            )
            .map_err(|e| write_failed(key, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.conn()?
            .execute("DELETE FROM kv WHERE key = ?1", params![key])
            .map_err(|e| write_failed(key, e))?;
        Ok(())
    }
}

fn read_failed(key: &str, err: rusqlite::Error) -> PersistenceError {
    match PersistenceError::from(err) {
        PersistenceError::Unavailable(message) => PersistenceError::ReadFailed {
            key: key.to_string(),
            message,
        },
        other => other,
    }
}

fn write_failed(key: &str, err: rusqlite::Error) -> PersistenceError {
    match PersistenceError::from(err) {
        PersistenceError::Unavailable(message) => PersistenceError::WriteFailed {
            key: key.to_string(),
            message,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = SqliteStore::open_memory().unwrap();
        assert!(db.get("test").unwrap().is_none());
        db.set("test", "hello").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "hello");
        db.set("test", "again").unwrap();
        assert_eq!(db.get("test").unwrap().unwrap(), "again");
        db.remove("test").unwrap();
        assert!(db.get("test").unwrap().is_none());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("state.db");
        {
            let db = SqliteStore::open_path(&path).unwrap();
            db.set("k", "{}").unwrap();
        }
        let db = SqliteStore::open_path(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("state.db");
        assert!(matches!(
            SqliteStore::open_path(&path),
            Err(PersistenceError::OpenFailed { .. })
        ));
    }
}
