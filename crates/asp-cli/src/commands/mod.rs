// Command handlers for the asp CLI

pub mod batch;
pub mod ops;
pub mod sessions;

pub use batch::{render_report, BatchCommand};
pub use ops::{OpsAction, OpsCommand};
pub use sessions::{SessionsAction, SessionsCommand};

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}
