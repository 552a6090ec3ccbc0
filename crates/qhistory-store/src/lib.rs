// Read-only record store adapter
// Hands out raw records; no parsing beyond column extraction

mod error;
mod memory;
mod record;
mod sqlite;

// Public API
pub use error::{Error, Result};
pub use memory::MemoryStore;
pub use record::{FileStamp, RawRecord, StoreFingerprint};
pub use sqlite::{CONVERSATIONS_TABLE, SqliteStore};

/// Source of raw conversation records.
///
/// Implementations must never write to the underlying storage and must
/// release any handle they acquire before returning.
pub trait RecordStore: Send + Sync {
    /// Read a single record by its workspace key
    fn read(&self, key: &str) -> Result<Option<RawRecord>>;

    /// Enumerate every record, ordered by store sequence ascending
    fn records(&self) -> Result<Vec<RawRecord>>;

    /// Cheap change detector used to decide whether a cached snapshot is stale
    fn fingerprint(&self) -> Result<StoreFingerprint>;

    /// Human-readable location for diagnostics
    fn location(&self) -> String;
}
