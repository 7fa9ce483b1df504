//! Sessions command - inspect and rotate audit sessions

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{print_line, OutputStyle};

/// Sessions command action
#[derive(Debug, Clone)]
pub enum SessionsAction {
    /// Start a new session and make it current
    New,
    /// Show the current session
    Current,
    /// List all sessions, newest first
    List,
}

pub struct SessionsCommand {
    action: SessionsAction,
    ctx: AppContext,
}

impl SessionsCommand {
    pub fn new(action: SessionsAction, ctx: AppContext) -> Self {
        Self { action, ctx }
    }
}

#[async_trait::async_trait]
impl Command for SessionsCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        let tracker = self.ctx.session_tracker()?;

        match self.action {
            SessionsAction::New => {
                let session = tracker.force_new_session()?;
                print_line(&style.success(&format!("Started session {}", session)));
            }
            SessionsAction::Current => {
                let session = tracker.current_session()?;
                print_line(&style.key_value("Current session", &session));
                print_line(&style.key_value(
                    "Path",
                    &tracker.session_path()?.display().to_string(),
                ));
            }
            SessionsAction::List => {
                let sessions = tracker.list_sessions()?;
                if sessions.is_empty() {
                    print_line(&style.info("No sessions found"));
                    return Ok(());
                }
                print_line(&style.header("Sessions"));
                for session in sessions {
                    print_line(&style.list_item(&format!(
                        "{} (created {}, {} configs)",
                        session.session_id, session.created_at, session.config_count
                    )));
                }
            }
        }
        Ok(())
    }
}
