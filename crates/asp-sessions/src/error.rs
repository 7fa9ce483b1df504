//! Error types for session tracking

use thiserror::Error;

/// Errors that can occur while tracking sessions
#[derive(Debug, Error)]
pub enum SessionError {
    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Artifact prefix would escape the session folder
    #[error("Invalid artifact prefix: '{0}'")]
    InvalidPrefix(String),
}

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;
