use std::fmt;

/// Result type for qhistory-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Query failures attributable to the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Limit out of range, empty query, and the like
    InvalidArgument(String),

    /// No retained conversation has the requested id
    NotFound(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NotFound(id) => write!(f, "Conversation not found: {}", id),
        }
    }
}

impl std::error::Error for Error {}
