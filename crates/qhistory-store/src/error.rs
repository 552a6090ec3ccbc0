use std::fmt;
use std::path::PathBuf;

/// Result type for qhistory-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the store layer
#[derive(Debug)]
pub enum Error {
    /// Store file missing or cannot be opened
    Unavailable { path: PathBuf, reason: String },

    /// Database operation failed
    Database(rusqlite::Error),

    /// IO operation failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unavailable { path, reason } => {
                write!(f, "Store unavailable at {}: {}", path.display(), reason)
            }
            Error::Database(err) => {
                let msg = err.to_string();
                // Detect a database that is not the Q CLI store and provide actionable hint
                if msg.contains("no such table") {
                    write!(
                        f,
                        "Database error: {}. Is this an Amazon Q CLI data.sqlite3 file?",
                        msg
                    )
                } else {
                    write!(f, "Database error: {}", err)
                }
            }
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Database(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Unavailable { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
