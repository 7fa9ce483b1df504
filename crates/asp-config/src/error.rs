//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
///
/// `origin` names the file (or "main config") the error was found in.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid JSON in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Expected a JSON object in {0}")]
    NotAnObject(String),

    #[error("Missing required field '{field}' in {origin}")]
    MissingField { field: String, origin: String },

    #[error("Invalid value for '{field}' in {origin}: {message}")]
    InvalidField {
        field: String,
        origin: String,
        message: String,
    },

    #[error("Settings error: {0}")]
    Settings(String),
}

impl ConfigError {
    /// Name of the offending field, if the error is about one
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::MissingField { field, .. } | ConfigError::InvalidField { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Settings(err.to_string())
    }
}
