use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::record::{RawRecord, StoreFingerprint};
use crate::{RecordStore, Result};

#[derive(Debug, Default)]
struct Inner {
    next_sequence: i64,
    generation: u64,
    rows: BTreeMap<String, (i64, Vec<u8>)>,
}

/// In-process record store.
///
/// Clones share the same rows, so a test can keep a handle and mutate the
/// store after handing a clone to a service. Updating an existing key keeps
/// its sequence, matching an upsert on the SQLite table.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or update a record with a JSON payload
    pub fn put(&self, key: impl Into<String>, payload: &serde_json::Value) {
        self.put_raw(key, payload.to_string().into_bytes());
    }

    /// Insert or update a record with arbitrary bytes
    pub fn put_raw(&self, key: impl Into<String>, body: impl Into<Vec<u8>>) {
        let mut inner = self.lock();
        let key = key.into();
        let sequence = match inner.rows.get(&key) {
            Some((sequence, _)) => *sequence,
            None => {
                inner.next_sequence += 1;
                inner.next_sequence
            }
        };
        inner.rows.insert(key, (sequence, body.into()));
        inner.generation += 1;
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.lock();
        let removed = inner.rows.remove(key).is_some();
        if removed {
            inner.generation += 1;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().rows.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<RawRecord>> {
        let inner = self.lock();
        Ok(inner
            .rows
            .get(key)
            .map(|(sequence, body)| RawRecord::new(key, *sequence, body.clone())))
    }

    fn records(&self) -> Result<Vec<RawRecord>> {
        let inner = self.lock();
        let mut records: Vec<RawRecord> = inner
            .rows
            .iter()
            .map(|(key, (sequence, body))| RawRecord::new(key.clone(), *sequence, body.clone()))
            .collect();
        records.sort_by_key(|r| r.store_sequence);
        Ok(records)
    }

    fn fingerprint(&self) -> Result<StoreFingerprint> {
        Ok(StoreFingerprint::Generation(self.lock().generation))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
