//! Throwaway SQLite database in the Q CLI's table layout.

use anyhow::{Context, Result};
use filetime::FileTime;
use qhistory_store::SqliteStore;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use crate::fixtures::sample_bodies;

/// Database file living in its own temporary directory.
///
/// Writes go through a fresh read-write connection each time, so the file is
/// never held open while the code under test reads it.
pub struct TestStore {
    dir: TempDir,
    path: PathBuf,
}

impl TestStore {
    /// Create an empty `conversations` table
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("Failed to create temp dir")?;
        let path = dir.path().join("data.sqlite3");

        let conn = Connection::open(&path).context("Failed to create test database")?;
        conn.execute_batch(
            r#"
            CREATE TABLE conversations (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        Ok(Self { dir, path })
    }

    /// Create a store pre-filled with `fixtures::sample_bodies`
    pub fn with_samples() -> Result<Self> {
        let store = Self::new()?;
        for (key, body) in sample_bodies() {
            store.insert_raw(&key, &body)?;
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the database; free for other test files
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Insert or update a record. Updating keeps the row's rowid.
    pub fn insert(&self, key: &str, payload: &Value) -> Result<()> {
        self.insert_raw(key, &payload.to_string())
    }

    pub fn insert_raw(&self, key: &str, body: &str) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute(
            "INSERT INTO conversations (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, body],
        )
        .with_context(|| format!("Failed to insert record {}", key))?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute("DELETE FROM conversations WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Move the file's mtime forward so a fingerprint change is observable
    /// even on filesystems with coarse timestamps.
    pub fn bump_mtime(&self, seconds: u64) -> Result<()> {
        let modified = std::fs::metadata(&self.path)?.modified()?;
        let later = modified
            .checked_add(Duration::from_secs(seconds))
            .unwrap_or_else(SystemTime::now);
        filetime::set_file_mtime(&self.path, FileTime::from_system_time(later))
            .context("Failed to set mtime")?;
        Ok(())
    }

    /// Read-only adapter over this database
    pub fn sqlite_store(&self) -> SqliteStore {
        SqliteStore::new(&self.path)
    }
}
