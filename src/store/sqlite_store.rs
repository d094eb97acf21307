use std::fs;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension};

use super::store_errors::StoreError;
use super::store_traits::StoreTrait;
use crate::errors::Result;

/// SQLite-backed key-value store. The connection sits behind a mutex: the
/// engine reads once at run start and writes at most once at run end, so a
/// single serialized connection is all the concurrency the store needs.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(db_path: &str) -> Result<Self> {
        if let Some(dir) = Path::new(db_path).parent() {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    StoreError::OpenFailed(db_path.to_string(), e.to_string())
                })?;
            }
        }
        let conn = Connection::open(db_path)
            .map_err(|e| StoreError::OpenFailed(db_path.to_string(), e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError::OpenFailed(":memory:".to_string(), e.to_string()))?;
        Self::init_schema(&conn)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::LockPoisoned.into())
    }
}

impl StoreTrait for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(StoreError::Query)?;
        Ok(value)
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO kv(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }
}
