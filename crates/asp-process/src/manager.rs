//! Process manager - runs commands to completion

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    config::{ProcessConfig, StdioMode},
    error::{ProcessError, Result},
    output::ProcessOutput,
};

/// Mockable command execution seam
///
/// Every external tool invocation goes through this trait so that callers can
/// substitute a scripted runner in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a command to completion (or timeout) and return its output
    async fn run(&self, config: ProcessConfig) -> Result<ProcessOutput>;
}

/// Runs real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessManager;

impl ProcessManager {
    /// Create new process manager
    pub fn new() -> Self {
        Self
    }

    fn build_command(config: &ProcessConfig) -> Command {
        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args);
        // A timed-out run drops the child future; the child must not outlive it.
        cmd.kill_on_drop(true);

        if let Some(ref dir) = config.working_dir {
            cmd.current_dir(dir);
        }

        for (key, value) in &config.env {
            cmd.env(key, value);
        }

        match config.stdio {
            StdioMode::Captured => {
                cmd.stdin(Stdio::null());
                cmd.stdout(Stdio::piped());
                cmd.stderr(Stdio::piped());
            }
            StdioMode::Inherited => {
                cmd.stdin(Stdio::inherit());
                cmd.stdout(Stdio::inherit());
                cmd.stderr(Stdio::inherit());
            }
        }

        cmd
    }
}

#[async_trait]
impl CommandRunner for ProcessManager {
    async fn run(&self, config: ProcessConfig) -> Result<ProcessOutput> {
        if config.command.trim().is_empty() {
            return Err(ProcessError::InvalidConfig("empty command".to_string()));
        }

        debug!(
            command = %config.command,
            args = ?config.redacted_args(),
            timeout = ?config.timeout,
            "Running process"
        );

        let child = Self::build_command(&config).spawn()?;
        let waiting = child.wait_with_output();

        let output = match config.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, waiting).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(command = %config.command, seconds = timeout.as_secs(), "Process timed out");
                    return Err(ProcessError::Timeout {
                        seconds: timeout.as_secs(),
                    });
                }
            },
            None => waiting.await,
        }
        .map_err(|e| ProcessError::Crashed {
            reason: e.to_string(),
        })?;

        let output = ProcessOutput::from(output);
        debug!(command = %config.command, code = ?output.code, "Process finished");
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let manager = ProcessManager::new();
        let output = manager
            .run(ProcessConfig::new("echo").args(["hello"]))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_reports_exit_code_and_stderr() {
        let manager = ProcessManager::new();
        let output = manager
            .run(ProcessConfig::new("sh").args(["-c", "echo boom >&2; exit 3"]))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr.trim(), "boom");
    }

    #[tokio::test]
    async fn test_run_times_out() {
        let manager = ProcessManager::new();
        let result = manager
            .run(ProcessConfig::new("sleep").args(["5"]).timeout_secs(1))
            .await;

        assert!(matches!(result, Err(ProcessError::Timeout { seconds: 1 })));
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let manager = ProcessManager::new();
        let result = manager
            .run(ProcessConfig::new("definitely-not-a-real-binary-asp"))
            .await;

        assert!(matches!(result, Err(ProcessError::SpawnFailed(_))));
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let manager = ProcessManager::new();
        let result = manager.run(ProcessConfig::new("  ")).await;
        assert!(matches!(result, Err(ProcessError::InvalidConfig(_))));
    }
}
