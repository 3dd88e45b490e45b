use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store connection lock was poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value store using SQLite
///
/// Values are JSON documents keyed by a string. Every write replaces the
/// whole value for its key; there is no merge and no transaction spanning
/// a read and a later write.
pub struct KvStore {
    conn: Mutex<Connection>,
}

impl KvStore {
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Throwaway store, gone when dropped
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Initialize schema on first run
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Raw JSON text stored under `key`
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;

        debug!("kv get {} -> {}", key, if value.is_some() { "hit" } else { "miss" });
        Ok(value)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE
             SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().timestamp_millis()],
        )?;

        debug!("kv set {} ({} bytes)", key, value.len());
        Ok(())
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get_raw(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key() {
        let store = KvStore::in_memory().unwrap();
        assert_eq!(store.get_raw("nope").unwrap(), None);
        assert_eq!(store.get::<Vec<i64>>("nope").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = KvStore::in_memory().unwrap();
        store.set("favoriteQuotes", &vec!["A - B"]).unwrap();
        store.set("favoriteQuotes", &vec!["C - D", "E - F"]).unwrap();

        let favorites: Vec<String> = store.get("favoriteQuotes").unwrap().unwrap();
        assert_eq!(favorites, vec!["C - D", "E - F"]);
    }

    #[test]
    fn test_corrupt_value_is_an_error() {
        let store = KvStore::in_memory().unwrap();
        store.set_raw("quoteGenerationTimes", "not json").unwrap();

        let err = store.get::<Vec<i64>>("quoteGenerationTimes").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quotebox.db");

        {
            let store = KvStore::new(&path).unwrap();
            store.set("quoteGenerationTimes", &[10_i64, 20]).unwrap();
        }

        let store = KvStore::new(&path).unwrap();
        let times: Vec<i64> = store.get("quoteGenerationTimes").unwrap().unwrap();
        assert_eq!(times, vec![10, 20]);
    }
}
