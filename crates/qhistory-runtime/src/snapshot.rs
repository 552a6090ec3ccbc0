use chrono::{DateTime, Utc};
use qhistory_engine::ConversationSet;
use qhistory_store::StoreFingerprint;

/// Immutable conversation set tagged with the store state it was built from.
///
/// Never patched: a store change produces a whole new snapshot.
#[derive(Debug)]
pub struct Snapshot {
    pub set: ConversationSet,
    pub fingerprint: StoreFingerprint,
    /// 1 for the first build, incremented on every rebuild
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub build_millis: u64,
}

impl Snapshot {
    pub fn is_current(&self, fingerprint: &StoreFingerprint) -> bool {
        &self.fingerprint == fingerprint
    }
}
