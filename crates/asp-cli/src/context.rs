//! Wiring from runtime settings to concrete provisioners

use std::sync::Arc;

use asp_config::{Settings, SettingsLoader};
use asp_http::{shared_client, HttpConfig};
use asp_process::{CommandRunner, ProcessManager};
use asp_provision::{
    AtlasCliAuth, AtlasConnectionProvisioner, AuthGate, BatchOrchestrator,
    ConfluentTopicProvisioner, Prompt, RemoteShell, StdinPrompt, StreamProcessorProvisioner,
};
use asp_sessions::SessionTracker;

use crate::error::{CliError, CliResult};

/// Shared state for every command
#[derive(Clone)]
pub struct AppContext {
    pub settings: Settings,
    runner: Arc<dyn CommandRunner>,
    prompt: Arc<dyn Prompt>,
}

impl AppContext {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            runner: Arc::new(ProcessManager::new()),
            prompt: Arc::new(StdinPrompt),
        }
    }

    /// Load settings from `path` (or the default location) and `ASP_*` variables
    pub fn load(path: Option<std::path::PathBuf>) -> CliResult<Self> {
        let loader = match path {
            Some(path) => SettingsLoader::new().with_path(path),
            None => SettingsLoader::new(),
        };
        Ok(Self::new(loader.load()?))
    }

    /// Replace the process runner and prompt (tests)
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>, prompt: Arc<dyn Prompt>) -> Self {
        self.runner = runner;
        self.prompt = prompt;
        self
    }

    pub fn auth_gate(&self) -> AtlasCliAuth {
        AtlasCliAuth::new(self.runner.clone(), self.prompt.clone())
            .with_binary(&self.settings.atlas_bin)
            .with_timeouts(self.settings.auth_check_timeout(), self.settings.login_timeout())
    }

    pub fn connection_provisioner(&self) -> AtlasConnectionProvisioner {
        AtlasConnectionProvisioner::new(self.runner.clone())
            .with_binary(&self.settings.atlas_bin)
            .with_timeout(self.settings.provision_timeout())
    }

    pub fn topic_provisioner(&self) -> CliResult<ConfluentTopicProvisioner> {
        let config = HttpConfig::default()
            .with_timeout(self.settings.provision_timeout())
            .with_optional_proxy(self.settings.http_proxy.as_deref());
        let client = shared_client(config).map_err(|e| CliError::Internal(e.to_string()))?;
        Ok(ConfluentTopicProvisioner::new(client))
    }

    pub fn remote_shell(&self) -> RemoteShell {
        RemoteShell::new(self.runner.clone())
            .with_binary(&self.settings.mongosh_bin)
            .with_timeout(self.settings.remote_shell_timeout())
    }

    pub fn processor_provisioner(&self) -> StreamProcessorProvisioner {
        StreamProcessorProvisioner::new(self.remote_shell())
    }

    pub fn orchestrator(&self) -> CliResult<BatchOrchestrator> {
        let auth: Arc<dyn AuthGate> = Arc::new(self.auth_gate());
        Ok(BatchOrchestrator::new(
            auth,
            Arc::new(self.connection_provisioner()),
            Arc::new(self.topic_provisioner()?),
            Arc::new(self.processor_provisioner()),
        ))
    }

    pub fn session_tracker(&self) -> CliResult<SessionTracker> {
        Ok(SessionTracker::open(&self.settings.sessions_dir)?)
    }
}
