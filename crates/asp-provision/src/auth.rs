//! Authentication gate in front of every batch

use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use asp_process::{CommandRunner, ProcessConfig};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Error checking Atlas CLI authentication: {0}")]
    CheckFailed(String),

    #[error("Cannot proceed without Atlas CLI authentication; run 'atlas auth login' and try again")]
    Declined,

    #[error("Failed to authenticate with Atlas CLI: {0}")]
    LoginFailed(String),
}

/// Must succeed before any provisioning call is made
#[async_trait]
pub trait AuthGate: Send + Sync {
    async fn ensure_authenticated(&self) -> Result<(), AuthError>;
}

/// Yes/no question to the operator
///
/// Implementations may block; the gate calls them on the blocking pool.
pub trait Prompt: Send + Sync {
    fn confirm(&self, question: &str) -> bool;
}

/// Reads the answer from stdin; empty, `y` and `yes` mean yes
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&self, question: &str) -> bool {
        print!("{} [Y/n]: ", question);
        if std::io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match std::io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_affirmative(&answer),
        }
    }
}

/// Default-yes answer parsing
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "" | "y" | "yes")
}

/// `atlas auth whoami`, falling back to an interactive `atlas auth login`
pub struct AtlasCliAuth {
    runner: Arc<dyn CommandRunner>,
    prompt: Arc<dyn Prompt>,
    binary: String,
    check_timeout: Duration,
    login_timeout: Duration,
}

impl AtlasCliAuth {
    pub fn new(runner: Arc<dyn CommandRunner>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            runner,
            prompt,
            binary: "atlas".to_string(),
            check_timeout: Duration::from_secs(10),
            login_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeouts(mut self, check: Duration, login: Duration) -> Self {
        self.check_timeout = check;
        self.login_timeout = login;
        self
    }

    /// True if the CLI already holds a session
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        let config = ProcessConfig::new(&self.binary)
            .args(["auth", "whoami"])
            .timeout(self.check_timeout);

        self.runner
            .run(config)
            .await
            .map(|output| output.success())
            .map_err(|e| AuthError::CheckFailed(e.to_string()))
    }

    /// Run the login flow attached to the terminal
    pub async fn login(&self) -> Result<(), AuthError> {
        let config = ProcessConfig::new(&self.binary)
            .args(["auth", "login"])
            .timeout(self.login_timeout)
            .interactive();

        match self.runner.run(config).await {
            Ok(output) if output.success() => Ok(()),
            Ok(output) => Err(AuthError::LoginFailed(format!(
                "login exited with code {:?}",
                output.code
            ))),
            Err(e) => Err(AuthError::LoginFailed(e.to_string())),
        }
    }
}

#[async_trait]
impl AuthGate for AtlasCliAuth {
    async fn ensure_authenticated(&self) -> Result<(), AuthError> {
        if self.is_authenticated().await? {
            info!("Already authenticated with Atlas CLI");
            return Ok(());
        }

        warn!("Not authenticated with Atlas CLI");
        let prompt = Arc::clone(&self.prompt);
        let accepted =
            tokio::task::spawn_blocking(move || prompt.confirm("Would you like to login now?"))
                .await
                .map_err(|e| AuthError::CheckFailed(format!("login prompt failed: {}", e)))?;
        if !accepted {
            return Err(AuthError::Declined);
        }

        self.login().await?;
        info!("Successfully authenticated with Atlas CLI");
        Ok(())
    }
}
