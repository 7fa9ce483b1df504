//! Remote shell execution against the stream processing engine

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use asp_config::DatabaseCredentials;
use asp_process::{CommandRunner, ProcessConfig};

use crate::{
    markers::has_existence_marker,
    outcome::{ProvisionFailure, ProvisionResult},
    pipeline::{Pipeline, ProcessOptions},
    provisioner::ProcessorProvisioner,
    script::ShellCommand,
};

/// Default remote shell timeout
pub const DEFAULT_SHELL_TIMEOUT: Duration = Duration::from_secs(60);

/// Outcome of one script evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Ensure `url` ends with exactly one `/`
pub fn normalize_engine_url(url: &str) -> String {
    format!("{}/", url.trim_end_matches('/'))
}

/// Authenticated `mongosh --eval` executor
///
/// Every higher-level engine operation renders a [`ShellCommand`] and goes
/// through [`RemoteShell::execute_remote_script`].
#[derive(Clone)]
pub struct RemoteShell {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    timeout: Duration,
}

impl RemoteShell {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "mongosh".to_string(),
            timeout: DEFAULT_SHELL_TIMEOUT,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run `script` on the engine over TLS, authenticating against `admin`
    pub async fn execute_remote_script(
        &self,
        credentials: &DatabaseCredentials,
        engine_url: &str,
        script: &str,
    ) -> asp_process::Result<ScriptOutput> {
        let config = ProcessConfig::new(&self.binary)
            .args([
                normalize_engine_url(engine_url).as_str(),
                "--tls",
                "--authenticationDatabase",
                "admin",
                "--username",
                credentials.user.as_str(),
                "--password",
                credentials.password.as_str(),
                "--eval",
                script,
            ])
            .timeout(self.timeout);

        debug!(script = %script, "Evaluating remote script");
        let output = self.runner.run(config).await?;

        Ok(ScriptOutput {
            success: output.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Render and run a command
    pub async fn execute(
        &self,
        credentials: &DatabaseCredentials,
        engine_url: &str,
        command: &ShellCommand,
    ) -> Result<ScriptOutput, ProvisionFailure> {
        let script = command.to_script()?;
        Ok(self
            .execute_remote_script(credentials, engine_url, &script)
            .await?)
    }
}

/// Stream processor creation through the remote shell
#[derive(Clone)]
pub struct StreamProcessorProvisioner {
    shell: RemoteShell,
}

impl StreamProcessorProvisioner {
    pub fn new(shell: RemoteShell) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> &RemoteShell {
        &self.shell
    }

    /// Execute an ad-hoc pipeline once with `sp.process`
    pub async fn run_pipeline(
        &self,
        credentials: &DatabaseCredentials,
        engine_url: &str,
        pipeline: Pipeline,
        options: Option<ProcessOptions>,
    ) -> Result<ScriptOutput, ProvisionFailure> {
        let command = ShellCommand::process(pipeline, options);
        let output = self.shell.execute(credentials, engine_url, &command).await?;
        if !output.success {
            warn!(stderr = %output.stderr.trim(), "Ad-hoc pipeline failed");
        }
        Ok(output)
    }
}

#[async_trait]
impl ProcessorProvisioner for StreamProcessorProvisioner {
    async fn provision_processor(
        &self,
        credentials: &DatabaseCredentials,
        engine_url: &str,
        name: &str,
        pipeline: &Pipeline,
    ) -> ProvisionResult {
        info!(processor = %name, "Creating stream processor");
        let command = ShellCommand::create_stream_processor(name, pipeline.clone());

        let output = match self.shell.execute(credentials, engine_url, &command).await {
            Ok(output) => output,
            Err(failure) => {
                warn!(processor = %name, error = %failure, "Stream processor creation failed");
                return ProvisionResult::failed(name, failure);
            }
        };

        // The shell can exit 0 while reporting an existing processor on stderr.
        if has_existence_marker(&output.stderr) {
            info!(processor = %name, "Stream processor already exists");
            ProvisionResult::reused(name)
        } else if output.success {
            info!(processor = %name, "Stream processor created");
            ProvisionResult::created(name)
        } else {
            warn!(processor = %name, stderr = %output.stderr.trim(), "Stream processor creation rejected");
            ProvisionResult::failed(
                name,
                ProvisionFailure::Rejected {
                    message: output.stderr,
                },
            )
        }
    }
}
