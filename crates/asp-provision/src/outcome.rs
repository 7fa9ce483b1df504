//! Typed provisioning outcomes

use std::fmt;

use asp_http::HttpError;
use asp_process::ProcessError;

/// Why a provisioning attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionFailure {
    /// The backend answered and refused (stderr of the CLI or shell)
    Rejected { message: String },
    Timeout { seconds: u64 },
    /// The external tool could not be started
    Spawn(String),
    /// The request never produced an HTTP response
    Transport(String),
    /// Non-success HTTP status that is not an existence signal
    Http { status: u16, body: String },
    Serialization(String),
    Io(String),
}

impl fmt::Display for ProvisionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionFailure::Rejected { message } => write!(f, "rejected: {}", message.trim()),
            ProvisionFailure::Timeout { seconds } => write!(f, "timed out after {}s", seconds),
            ProvisionFailure::Spawn(msg) => write!(f, "could not start command: {}", msg),
            ProvisionFailure::Transport(msg) => write!(f, "network error: {}", msg),
            ProvisionFailure::Http { status, body } => write!(f, "HTTP {}: {}", status, body),
            ProvisionFailure::Serialization(msg) => write!(f, "serialization error: {}", msg),
            ProvisionFailure::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl From<ProcessError> for ProvisionFailure {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Timeout { seconds } => ProvisionFailure::Timeout { seconds },
            ProcessError::SpawnFailed(e) => ProvisionFailure::Spawn(e.to_string()),
            ProcessError::InvalidConfig(msg) => ProvisionFailure::Spawn(msg),
            ProcessError::Crashed { reason } => ProvisionFailure::Io(reason),
        }
    }
}

impl From<HttpError> for ProvisionFailure {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(duration) => ProvisionFailure::Timeout {
                seconds: duration.as_secs(),
            },
            other => ProvisionFailure::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ProvisionFailure {
    fn from(err: serde_json::Error) -> Self {
        ProvisionFailure::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ProvisionFailure {
    fn from(err: std::io::Error) -> Self {
        ProvisionFailure::Io(err.to_string())
    }
}

/// Result of one create-or-reuse attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    /// The resource already existed and is reused as is
    Reused,
    Failed(ProvisionFailure),
}

/// A named resource and what happened to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionResult {
    pub resource: String,
    pub outcome: Outcome,
}

impl ProvisionResult {
    pub fn created(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            outcome: Outcome::Created,
        }
    }

    pub fn reused(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            outcome: Outcome::Reused,
        }
    }

    pub fn failed(resource: impl Into<String>, failure: impl Into<ProvisionFailure>) -> Self {
        Self {
            resource: resource.into(),
            outcome: Outcome::Failed(failure.into()),
        }
    }

    /// Created or reused
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Created | Outcome::Reused)
    }

    pub fn was_created(&self) -> bool {
        matches!(self.outcome, Outcome::Created)
    }

    pub fn failure(&self) -> Option<&ProvisionFailure> {
        match &self.outcome {
            Outcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Short status word for summaries
    pub fn status_label(&self) -> &'static str {
        match self.outcome {
            Outcome::Created => "created",
            Outcome::Reused => "reused (already existed)",
            Outcome::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_predicates() {
        let created = ProvisionResult::created("conn");
        let reused = ProvisionResult::reused("conn");
        let failed = ProvisionResult::failed("conn", ProvisionFailure::Timeout { seconds: 30 });

        assert!(created.is_success() && created.was_created());
        assert!(reused.is_success() && !reused.was_created());
        assert!(!failed.is_success() && !failed.was_created());
        assert_eq!(failed.failure(), Some(&ProvisionFailure::Timeout { seconds: 30 }));
    }

    #[test]
    fn test_process_error_mapping() {
        let failure: ProvisionFailure = ProcessError::Timeout { seconds: 60 }.into();
        assert_eq!(failure, ProvisionFailure::Timeout { seconds: 60 });

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let failure: ProvisionFailure = ProcessError::SpawnFailed(io).into();
        assert!(matches!(failure, ProvisionFailure::Spawn(_)));
    }

    #[test]
    fn test_http_timeout_mapping() {
        let failure: ProvisionFailure =
            HttpError::Timeout(std::time::Duration::from_secs(30)).into();
        assert_eq!(failure, ProvisionFailure::Timeout { seconds: 30 });
    }
}
