//! Ops command - run registered operations from JSON configs

use std::path::{Path, PathBuf};

use serde_json::Value;

use asp_config::{load_json_value, ConfigError};

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::{CliError, CliResult};
use crate::ops;
use crate::output::{print_line, OutputStyle};

/// Ops command action
#[derive(Debug, Clone)]
pub enum OpsAction {
    /// List registered operations
    List,
    /// Run an operation with parameters from a JSON file
    Run { name: String, config: PathBuf },
    /// Write a config template for an operation into the current session
    Template { name: String },
}

pub struct OpsCommand {
    action: OpsAction,
    ctx: AppContext,
}

impl OpsCommand {
    pub fn new(action: OpsAction, ctx: AppContext) -> Self {
        Self { action, ctx }
    }

    fn list(&self, style: &OutputStyle) {
        print_line(&style.header("Operations"));
        for op in ops::operations() {
            print_line(&style.key_value(op.name, op.description));
            for param in op.params {
                let marker = if param.required { "" } else { " (optional)" };
                print_line(&format!("    {}{}: {}", param.name, marker, param.description));
            }
        }
    }

    async fn run(&self, style: &OutputStyle, name: &str, config: &Path) -> CliResult<()> {
        let op = ops::find(name)?;
        let params = match load_json_value(config)? {
            Value::Object(map) => map,
            _ => {
                return Err(ConfigError::NotAnObject(config.display().to_string()).into())
            }
        };

        print_line(&style.info(&format!("Calling {} with provided parameters...", op.name)));
        let outcome = op.invoke(&self.ctx, &params).await?;

        if let Some(details) = &outcome.details {
            if let Ok(pretty) = serde_json::to_string_pretty(details) {
                print_line(&pretty);
            }
        }

        if outcome.success {
            print_line(&style.success(&outcome.message));
            Ok(())
        } else {
            Err(CliError::OperationFailed {
                name: op.name.to_string(),
                message: outcome.message,
            })
        }
    }

    fn template(&self, style: &OutputStyle, name: &str) -> CliResult<()> {
        let op = ops::find(name)?;
        let tracker = self.ctx.session_tracker()?;
        let path = tracker.new_config_file(&op.template(), op.name)?;
        print_line(&style.success(&format!("Template written to {}", path.display())));
        Ok(())
    }
}

#[async_trait::async_trait]
impl Command for OpsCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        match &self.action {
            OpsAction::List => {
                self.list(&style);
                Ok(())
            }
            OpsAction::Run { name, config } => self.run(&style, name, config).await,
            OpsAction::Template { name } => self.template(&style, name),
        }
    }
}
