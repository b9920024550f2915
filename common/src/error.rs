use std::fmt;

/// Errors raised at the edges of the engine: configuration, dataset loading
/// and the mailbox to the clustering worker. The clustering pipeline itself
/// never fails.
#[derive(Debug)]
pub enum EngineError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidConfig(String),
    Mailbox(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io(err) => write!(f, "I/O error: {}", err),
            EngineError::Json(err) => write!(f, "JSON error: {}", err),
            EngineError::InvalidConfig(reason) => write!(f, "invalid configuration: {}", reason),
            EngineError::Mailbox(reason) => write!(f, "clustering worker unreachable: {}", reason),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io(err) => Some(err),
            EngineError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::Io(err)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Json(err)
    }
}

impl From<actix::MailboxError> for EngineError {
    fn from(err: actix::MailboxError) -> Self {
        EngineError::Mailbox(err.to_string())
    }
}

impl From<EngineError> for std::io::Error {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Io(err) => err,
            other => std::io::Error::new(std::io::ErrorKind::InvalidInput, other.to_string()),
        }
    }
}
