use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::record::{FileStamp, RawRecord, StoreFingerprint};
use crate::{Error, RecordStore, Result};

// NOTE: Access Model
//
// The Q CLI keeps writing to this database while we read it. We therefore:
// - open with SQLITE_OPEN_READ_ONLY so no write lock is ever requested
// - open one connection per operation and drop it before returning
// - treat rowid as the only ordering signal (the table has no timestamps)

/// Table the Q CLI persists conversation state in
pub const CONVERSATIONS_TABLE: &str = "conversations";

const BUSY_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Record store backed by the Q CLI `data.sqlite3` file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Create a store handle without touching the file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store handle and verify the database can be opened and queried
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(path);
        store.count()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows in the conversations table
    pub fn count(&self) -> Result<usize> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", CONVERSATIONS_TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn connect(&self) -> Result<Connection> {
        if !self.path.is_file() {
            return Err(Error::Unavailable {
                path: self.path.clone(),
                reason: "database file not found".to_string(),
            });
        }

        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|err| Error::Unavailable {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        Ok(conn)
    }

    fn stamp(path: &Path) -> Result<Option<FileStamp>> {
        match std::fs::metadata(path) {
            Ok(meta) => Ok(Some(FileStamp {
                path: path.to_path_buf(),
                len: meta.len(),
                modified: meta.modified().ok(),
            })),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Error::Io(err)),
        }
    }

    fn wal_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push("-wal");
        PathBuf::from(name)
    }
}

/// Column contents as bytes, whatever type SQLite stored them with
fn column_bytes(value: ValueRef<'_>) -> Vec<u8> {
    match value {
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
        ValueRef::Null => Vec::new(),
        ValueRef::Integer(i) => i.to_string().into_bytes(),
        ValueRef::Real(f) => f.to_string().into_bytes(),
    }
}

// Keys are read lossily: one row with a non-UTF-8 or BLOB key must not
// abort the enumeration of every other row.
fn row_to_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    let store_sequence: i64 = row.get(0)?;
    let key = String::from_utf8_lossy(&column_bytes(row.get_ref(1)?)).into_owned();
    let body = column_bytes(row.get_ref(2)?);

    Ok(RawRecord {
        key,
        store_sequence,
        body,
    })
}

impl RecordStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<RawRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT rowid, key, value FROM {} WHERE key = ?1",
                    CONVERSATIONS_TABLE
                ),
                [key],
                row_to_record,
            )
            .optional()?;

        Ok(record)
    }

    fn records(&self) -> Result<Vec<RawRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT rowid, key, value FROM {} ORDER BY rowid ASC",
            CONVERSATIONS_TABLE
        ))?;

        let records = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "enumerated store records"
        );

        Ok(records)
    }

    fn fingerprint(&self) -> Result<StoreFingerprint> {
        let Some(main) = Self::stamp(&self.path)? else {
            return Err(Error::Unavailable {
                path: self.path.clone(),
                reason: "database file not found".to_string(),
            });
        };

        let mut stamps = vec![main];
        if let Some(wal) = Self::stamp(&self.wal_path())? {
            stamps.push(wal);
        }

        Ok(StoreFingerprint::Files(stamps))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_store(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("data.sqlite3");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE conversations (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .unwrap();
        path
    }

    #[test]
    fn test_wal_path_appends_suffix() {
        let store = SqliteStore::new("/tmp/data.sqlite3");
        assert_eq!(store.wal_path(), PathBuf::from("/tmp/data.sqlite3-wal"));
    }

    #[test]
    fn test_fingerprint_changes_when_file_grows() {
        let dir = TempDir::new().unwrap();
        let path = create_store(&dir);
        let store = SqliteStore::new(&path);

        let before = store.fingerprint().unwrap();

        let conn = Connection::open(&path).unwrap();
        let big = "x".repeat(64 * 1024);
        conn.execute(
            "INSERT INTO conversations (key, value) VALUES (?1, ?2)",
            ["/tmp/ws", big.as_str()],
        )
        .unwrap();
        drop(conn);

        let after = store.fingerprint().unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn test_fingerprint_of_missing_file_is_unavailable() {
        let store = SqliteStore::new("/definitely/not/here/data.sqlite3");
        assert!(matches!(
            store.fingerprint(),
            Err(Error::Unavailable { .. })
        ));
    }
}
