use std::fmt;

/// Result type for qhistory-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types surfaced to front ends
#[derive(Debug)]
pub enum Error {
    /// Store missing, unreadable or not a Q CLI database
    StoreUnavailable(qhistory_store::Error),

    /// Caller supplied a bad limit or query
    InvalidArgument(String),

    /// No conversation with the requested id
    NotFound(String),

    /// Configuration error
    Config(String),

    /// IO operation failed
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::StoreUnavailable(err) => write!(f, "{}", err),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::NotFound(id) => write!(f, "Conversation not found: {}", id),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::StoreUnavailable(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::InvalidArgument(_) | Error::NotFound(_) | Error::Config(_) => None,
        }
    }
}

impl From<qhistory_store::Error> for Error {
    fn from(err: qhistory_store::Error) -> Self {
        Error::StoreUnavailable(err)
    }
}

impl From<qhistory_engine::Error> for Error {
    fn from(err: qhistory_engine::Error) -> Self {
        match err {
            qhistory_engine::Error::InvalidArgument(msg) => Error::InvalidArgument(msg),
            qhistory_engine::Error::NotFound(id) => Error::NotFound(id),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
