// CLI error types

use thiserror::Error;

use asp_config::ConfigError;
use asp_provision::BatchError;
use asp_sessions::SessionError;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Missing parameter '{param}' for operation '{operation}'")]
    MissingParameter { operation: String, param: String },

    #[error("Invalid parameter '{param}' for operation '{operation}': {message}")]
    InvalidParameter {
        operation: String,
        param: String,
        message: String,
    },

    #[error("Operation '{name}' failed: {message}")]
    OperationFailed { name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Batch(#[from] BatchError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!("Invalid argument: {}\n\nRun 'asp --help' for usage information.", message)
            }
            CliError::UnknownOperation(name) => {
                format!("Unknown operation '{}'.\n\nRun 'asp ops list' for available operations.", name)
            }
            CliError::MissingParameter { operation, param } => format!(
                "Missing parameter '{}' for operation '{}'.\n\nRun 'asp ops template {}' to generate a config template.",
                param, operation, operation
            ),
            CliError::Config(e) => format!("Configuration error: {}", e),
            CliError::Batch(e) if e.is_authentication() => {
                format!("{}\n\nAll processing stopped due to authentication failure.", e)
            }
            CliError::Internal(msg) => format!("Internal error: {}\n\nPlease report this issue.", msg),
            other => other.to_string(),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
