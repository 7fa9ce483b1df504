//! Batch-level errors
//!
//! Only conditions that stop a batch before any per-file work are errors;
//! everything else is recorded in the report.

use thiserror::Error;

use crate::auth::AuthError;

pub type Result<T> = std::result::Result<T, BatchError>;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Authentication(#[from] AuthError),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Path is not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to read folder {path}: {source}")]
    ReadFolder {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl BatchError {
    pub fn is_authentication(&self) -> bool {
        matches!(self, BatchError::Authentication(_))
    }
}
