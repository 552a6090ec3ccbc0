use std::path::PathBuf;
use std::time::SystemTime;

/// Raw record as persisted by the Q CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Workspace directory the conversation belongs to (the row key).
    pub key: String,
    /// Store-assigned ordinal (SQLite rowid). Not guaranteed contiguous.
    pub store_sequence: i64,
    /// Unparsed payload bytes.
    pub body: Vec<u8>,
}

impl RawRecord {
    pub fn new(key: impl Into<String>, store_sequence: i64, body: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            store_sequence,
            body: body.into(),
        }
    }

    /// Parse the body as JSON
    pub fn payload(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

/// Size and modification time of one file backing a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStamp {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

/// Change detector for a record store.
///
/// Two equal fingerprints mean the store is assumed unchanged; a cached
/// snapshot built under one fingerprint is reused until it differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFingerprint {
    Files(Vec<FileStamp>),
    Generation(u64),
}
