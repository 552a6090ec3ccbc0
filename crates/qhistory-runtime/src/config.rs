use crate::{Error, Result};
use qhistory_engine::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, QueryOptions};
use qhistory_types::DEFAULT_PREVIEW_CHARS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory under the platform config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "qhistory";

/// Location of the Q CLI database relative to the platform data dir
const Q_DATA_DIR_NAME: &str = "amazon-q";
const Q_DATABASE_FILE: &str = "data.sqlite3";

/// Resolve the Q CLI database path based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. `store_path` from the config file (with tilde expansion)
/// 3. Platform data directory (`~/.local/share` on Linux,
///    `~/Library/Application Support` on macOS)
pub fn resolve_store_path(explicit_path: Option<&str>, config: &Config) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Some(path) = &config.store_path {
        return Ok(expand_tilde(&path.to_string_lossy()));
    }

    dirs::data_dir()
        .map(|dir| dir.join(Q_DATA_DIR_NAME).join(Q_DATABASE_FILE))
        .ok_or_else(|| {
            Error::Config(
                "Could not determine the Amazon Q data directory; pass --db explicitly".to_string(),
            )
        })
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return home;
    }
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    pub list_limit: usize,
    pub search_limit: usize,
    pub preview_chars: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            list_limit: DEFAULT_LIST_LIMIT,
            search_limit: DEFAULT_SEARCH_LIMIT,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl QueryConfig {
    pub fn options(&self) -> QueryOptions {
        QueryOptions {
            list_limit: self.list_limit,
            search_limit: self.search_limit,
            preview_chars: self.preview_chars,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()?),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    fn validate(&self) -> Result<()> {
        let limits = [
            ("query.list_limit", self.query.list_limit),
            ("query.search_limit", self.query.search_limit),
            ("query.preview_chars", self.query.preview_chars),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, value)| *value == 0) {
            return Err(Error::Config(format!("{} must be greater than 0", name)));
        }
        Ok(())
    }
}
