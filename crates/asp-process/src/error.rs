//! Error types for process execution

use std::io;
use thiserror::Error;

/// Process execution errors
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] io::Error),

    /// Process timed out
    #[error("Process timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Process crashed or its output could not be collected
    #[error("Process crashed: {reason}")]
    Crashed { reason: String },

    /// Invalid configuration
    #[error("Invalid process configuration: {0}")]
    InvalidConfig(String),
}

impl ProcessError {
    /// True when the process was stopped because it exceeded its timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProcessError::Timeout { .. })
    }
}

/// Result type for process operations
pub type Result<T> = std::result::Result<T, ProcessError>;
