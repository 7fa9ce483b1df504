//! Runtime settings: tool binaries, timeouts and the sessions directory

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Runtime settings
///
/// Every field has a default so an absent settings file is fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Database platform CLI
    pub atlas_bin: String,
    /// Stream processing shell
    pub mongosh_bin: String,
    pub auth_check_timeout_secs: u64,
    pub login_timeout_secs: u64,
    /// Applies to connection creation and topic REST calls
    pub provision_timeout_secs: u64,
    pub remote_shell_timeout_secs: u64,
    /// Parent of the `sessions/` folder
    pub sessions_dir: PathBuf,
    /// Proxy for Kafka REST calls
    pub http_proxy: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            atlas_bin: "atlas".to_string(),
            mongosh_bin: "mongosh".to_string(),
            auth_check_timeout_secs: 10,
            login_timeout_secs: 120,
            provision_timeout_secs: 30,
            remote_shell_timeout_secs: 60,
            sessions_dir: PathBuf::from("temp"),
            http_proxy: None,
        }
    }
}

impl Settings {
    pub fn auth_check_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_check_timeout_secs)
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }

    pub fn provision_timeout(&self) -> Duration {
        Duration::from_secs(self.provision_timeout_secs)
    }

    pub fn remote_shell_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_shell_timeout_secs)
    }
}

/// Loads [`Settings`] from an optional file layered under environment variables
pub struct SettingsLoader {
    path: PathBuf,
    env_prefix: String,
}

impl SettingsLoader {
    /// Loader over the default path with the `ASP` prefix
    pub fn new() -> Self {
        Self {
            path: Self::default_path(),
            env_prefix: "ASP".to_string(),
        }
    }

    /// Create with custom settings file
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// `<config dir>/asp/settings.toml`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("asp")
            .join("settings.toml")
    }

    pub fn load(&self) -> Result<Settings> {
        debug!(path = %self.path.display(), prefix = %self.env_prefix, "Loading settings");

        let config = Config::builder()
            .add_source(File::from(self.path.clone()).required(false))
            .add_source(Environment::with_prefix(&self.env_prefix).try_parsing(true))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
