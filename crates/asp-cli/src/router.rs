// Command routing and dispatch

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use asp_config::Direction;

use crate::commands::*;
use crate::context::AppContext;
use crate::error::CliResult;

/// asp - provision streaming plumbing between Kafka and MongoDB Atlas Stream Processing
#[derive(Parser, Debug)]
#[command(name = "asp")]
#[command(bin_name = "asp")]
#[command(about = "Provision Kafka topics, connections and stream processors from connector configs")]
#[command(
    long_about = "asp: idempotent provisioning of streaming plumbing.\n\nEvery resource is created if missing and reused if it already exists, so a batch can be re-run safely.\n\nQuick Start:\n  • asp source main.json connectors/   Change streams into Kafka topics\n  • asp sink main.json connectors/     Kafka topics into collections\n  • asp ops list                       Single operations\n  • asp sessions list                  Generated config history"
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimize output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Settings file (binaries, timeouts, sessions directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create source stream processors (collection change streams to topics)
    #[command(about = "Provision topics, connections and source processors for a folder of connector configs")]
    Source {
        /// Main configuration file
        #[arg(value_name = "MAIN_CONFIG")]
        main_config: PathBuf,

        /// Folder of source connector configs
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },

    /// Create sink stream processors (topics to collections)
    #[command(about = "Provision connections and sink processors for a folder of connector configs")]
    Sink {
        /// Main configuration file
        #[arg(value_name = "MAIN_CONFIG")]
        main_config: PathBuf,

        /// Folder of sink connector configs
        #[arg(value_name = "FOLDER")]
        folder: PathBuf,
    },

    /// Run single registered operations
    #[command(about = "List, run and template single provisioning operations")]
    Ops {
        #[command(subcommand)]
        action: OpsSubcommand,
    },

    /// Manage audit sessions
    #[command(about = "Inspect and rotate sessions of generated configs")]
    Sessions {
        #[command(subcommand)]
        action: Option<SessionsSubcommand>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum OpsSubcommand {
    /// List registered operations
    List,

    /// Run an operation with parameters from a JSON file
    Run {
        /// Operation name
        #[arg(value_name = "NAME")]
        name: String,

        /// JSON object holding the parameters
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },

    /// Write a config template for an operation into the current session
    Template {
        /// Operation name
        #[arg(value_name = "NAME")]
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SessionsSubcommand {
    /// List sessions, newest first
    List,
    /// Show the current session
    Current,
    /// Start a new session
    New,
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse arguments and execute the selected command
    pub async fn route() -> CliResult<()> {
        let cli = Cli::parse();

        crate::logging::init_logging(cli.verbose, cli.quiet);

        Self::execute(&cli).await
    }

    /// Execute a command
    pub async fn execute(cli: &Cli) -> CliResult<()> {
        let ctx = AppContext::load(cli.settings.clone())?;
        Self::execute_with(cli, ctx).await
    }

    /// Execute a command against an existing context
    pub async fn execute_with(cli: &Cli, ctx: AppContext) -> CliResult<()> {
        match &cli.command {
            Commands::Source {
                main_config,
                folder,
            } => {
                let cmd = BatchCommand::new(Direction::Source, main_config.clone(), folder.clone(), ctx);
                cmd.execute().await
            }
            Commands::Sink {
                main_config,
                folder,
            } => {
                let cmd = BatchCommand::new(Direction::Sink, main_config.clone(), folder.clone(), ctx);
                cmd.execute().await
            }
            Commands::Ops { action } => {
                let ops_action = match action {
                    OpsSubcommand::List => OpsAction::List,
                    OpsSubcommand::Run { name, config } => OpsAction::Run {
                        name: name.clone(),
                        config: config.clone(),
                    },
                    OpsSubcommand::Template { name } => OpsAction::Template { name: name.clone() },
                };
                let cmd = OpsCommand::new(ops_action, ctx);
                cmd.execute().await
            }
            Commands::Sessions { action } => {
                let sessions_action = match action {
                    Some(SessionsSubcommand::List) | None => SessionsAction::List,
                    Some(SessionsSubcommand::Current) => SessionsAction::Current,
                    Some(SessionsSubcommand::New) => SessionsAction::New,
                };
                let cmd = SessionsCommand::new(sessions_action, ctx);
                cmd.execute().await
            }
        }
    }
}
