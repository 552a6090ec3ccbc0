pub mod config;
mod error;
mod service;
mod snapshot;

pub use config::{Config, QueryConfig, expand_tilde, resolve_store_path};
pub use error::{Error, Result};
pub use service::{Diagnostics, ExportReport, HistoryService};
pub use snapshot::Snapshot;

// Re-exported so front ends depend on the runtime alone
pub use qhistory_engine::{ConversationDetail, QueryOptions, SetStats};
pub use qhistory_store::{MemoryStore, RecordStore, SqliteStore};
pub use qhistory_types::{Conversation, ConversationSummary, SchemaVariant, SearchHit, Turn};
