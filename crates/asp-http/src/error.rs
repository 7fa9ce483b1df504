//! HTTP client error types

use thiserror::Error;

/// Result type for HTTP operations
pub type Result<T> = std::result::Result<T, HttpError>;

/// HTTP client errors
///
/// Non-2xx responses are not errors at this layer: callers inspect the
/// status and body themselves.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network request failed
    #[error("Network request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Invalid proxy configuration
    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    /// Client build error
    #[error("Failed to build HTTP client: {0}")]
    BuildError(String),
}

impl HttpError {
    /// True when the request never produced a response (timeout, connect failure)
    pub fn is_transport(&self) -> bool {
        match self {
            HttpError::RequestFailed(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            HttpError::Timeout(_) => true,
            _ => false,
        }
    }
}
