use chrono::{DateTime, Utc};
use qhistory_engine::{ConversationDetail, ConversationSet, QueryOptions, SetStats};
use qhistory_store::{RecordStore, SqliteStore, StoreFingerprint};
use qhistory_types::{Conversation, ConversationSummary, SearchHit};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::config::{Config, expand_tilde, resolve_store_path};
use crate::snapshot::Snapshot;
use crate::Result;

/// Result of writing an export to disk
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub id: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Store health report backing `qhistory doctor`
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostics {
    pub store: String,
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub build_millis: u64,
    #[serde(flatten)]
    pub stats: SetStats,
}

#[derive(Default)]
struct Cache {
    current: Option<Arc<Snapshot>>,
    generation: u64,
}

// NOTE: Snapshot Cache
//
// The cache mutex is held across fingerprinting and rebuilding. Callers that
// arrive while a rebuild is running wait, then find a snapshot whose
// fingerprint matches and reuse it, so at most one rebuild runs at a time.
// Readers get an `Arc<Snapshot>` and never observe a half-built set.

/// Read-only history service over one record store.
pub struct HistoryService {
    store: Box<dyn RecordStore>,
    options: QueryOptions,
    cache: Mutex<Cache>,
}

impl HistoryService {
    pub fn new(store: Box<dyn RecordStore>, options: QueryOptions) -> Self {
        Self {
            store,
            options,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Open the SQLite store at `path`, failing early if it is unusable
    pub fn open(path: &Path, options: QueryOptions) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        Ok(Self::new(Box::new(store), options))
    }

    /// Resolve the store path from `explicit_db` and `config`, then open it
    pub fn from_config(config: &Config, explicit_db: Option<&str>) -> Result<Self> {
        let path = resolve_store_path(explicit_db, config)?;
        tracing::debug!(path = %path.display(), "opening conversation store");
        Self::open(&path, config.query.options())
    }

    /// Like `from_config`, but the database is first touched by the first
    /// query. A missing file then surfaces per call instead of up front.
    pub fn from_config_deferred(config: &Config, explicit_db: Option<&str>) -> Result<Self> {
        let path = resolve_store_path(explicit_db, config)?;
        Ok(Self::new(
            Box::new(SqliteStore::new(path)),
            config.query.options(),
        ))
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    fn lock_cache(&self) -> MutexGuard<'_, Cache> {
        // A panic mid-rebuild leaves the previous snapshot intact
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current snapshot, rebuilt first if the store changed
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        let mut cache = self.lock_cache();
        let fingerprint = self.store.fingerprint()?;

        if let Some(current) = &cache.current
            && current.is_current(&fingerprint)
        {
            tracing::debug!(generation = current.generation, "reusing cached snapshot");
            return Ok(Arc::clone(current));
        }

        self.rebuild(&mut cache, fingerprint)
    }

    /// Rebuild regardless of the fingerprint
    pub fn refresh(&self) -> Result<Arc<Snapshot>> {
        let mut cache = self.lock_cache();
        let fingerprint = self.store.fingerprint()?;
        self.rebuild(&mut cache, fingerprint)
    }

    fn rebuild(&self, cache: &mut Cache, fingerprint: StoreFingerprint) -> Result<Arc<Snapshot>> {
        let started = Instant::now();
        let records = self.store.records()?;
        let set = ConversationSet::build(&records);
        let build_millis = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        cache.generation += 1;
        tracing::info!(
            generation = cache.generation,
            records = records.len(),
            conversations = set.len(),
            malformed = set.malformed().len(),
            elapsed_ms = build_millis,
            "rebuilt conversation snapshot"
        );

        let snapshot = Arc::new(Snapshot {
            set,
            fingerprint,
            generation: cache.generation,
            built_at: Utc::now(),
            build_millis,
        });
        cache.current = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn list(&self, limit: Option<i64>) -> Result<Vec<ConversationSummary>> {
        Ok(self.snapshot()?.set.list(limit, &self.options)?)
    }

    pub fn search(&self, query: &str, limit: Option<i64>) -> Result<Vec<SearchHit>> {
        Ok(self.snapshot()?.set.search(query, limit, &self.options)?)
    }

    pub fn get_detail(&self, id: &str) -> Result<Conversation> {
        Ok(self.snapshot()?.set.get_detail(id)?)
    }

    pub fn get_detail_limited(&self, id: &str, turn_limit: Option<i64>) -> Result<ConversationDetail> {
        Ok(self.snapshot()?.set.get_detail_limited(id, turn_limit)?)
    }

    pub fn export_markdown(&self, id: &str) -> Result<String> {
        Ok(self.snapshot()?.set.export_markdown(id)?)
    }

    /// Write the markdown export to `output`.
    ///
    /// `~` is expanded, `.md` is appended when missing and parent
    /// directories are created.
    pub fn export_to_file(&self, id: &str, output: &str) -> Result<ExportReport> {
        let markdown = self.export_markdown(id)?;
        let path = markdown_path(output);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &markdown)?;

        tracing::info!(id, path = %path.display(), bytes = markdown.len(), "exported conversation");
        Ok(ExportReport {
            id: id.to_string(),
            path,
            bytes: markdown.len(),
        })
    }

    pub fn diagnostics(&self) -> Result<Diagnostics> {
        let snapshot = self.snapshot()?;
        Ok(Diagnostics {
            store: self.location(),
            generation: snapshot.generation,
            built_at: snapshot.built_at,
            build_millis: snapshot.build_millis,
            stats: snapshot.set.stats(),
        })
    }
}

fn markdown_path(output: &str) -> PathBuf {
    let path = expand_tilde(output);
    if path.extension().is_some_and(|ext| ext == "md") {
        return path;
    }
    let mut with_ext = path.into_os_string();
    with_ext.push(".md");
    PathBuf::from(with_ext)
}
