//! # asp-process
//!
//! **Purpose**: Run external command-line tools (`atlas`, `mongosh`) to
//! completion with a bounded timeout and captured output.
//!
//! ## Features
//!
//! - **Timeouts**: every run may carry a timeout; a stalled child is killed
//! - **Output Capture**: exit code, stdout and stderr as lossy UTF-8
//! - **Interactive Mode**: inherit the parent terminal for login flows
//! - **Secret Redaction**: `--password` values never reach the logs
//! - **Mockable**: all execution goes through the `CommandRunner` trait
//!
//! ## Usage
//!
//! ```rust,no_run
//! use asp_process::{CommandRunner, ProcessConfig, ProcessManager};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ProcessManager::new();
//! let output = manager
//!     .run(ProcessConfig::new("atlas").args(["auth", "whoami"]).timeout_secs(10))
//!     .await?;
//! println!("authenticated: {}", output.success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod output;

pub use config::{ProcessConfig, StdioMode};
pub use error::{ProcessError, Result};
pub use manager::{CommandRunner, ProcessManager};
pub use output::ProcessOutput;
