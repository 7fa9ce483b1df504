//! # asp-cli
//!
//! Command-line front end: `source`/`sink` batches, single operations from
//! the static registry, and session inspection.

pub mod commands;
pub mod context;
pub mod error;
pub mod logging;
pub mod ops;
pub mod output;
pub mod router;

pub use context::AppContext;
pub use error::{CliError, CliResult};
pub use router::{Cli, CommandRouter, Commands};
