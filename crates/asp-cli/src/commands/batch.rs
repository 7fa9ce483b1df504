//! Batch command - provision every connector file in a folder

use std::path::PathBuf;

use asp_config::{Direction, MainConfig};
use asp_provision::{BatchReport, FileOutcome};
use tracing::info;

use crate::commands::Command;
use crate::context::AppContext;
use crate::error::CliResult;
use crate::output::{print_line, OutputStyle};

/// `asp source` / `asp sink`
pub struct BatchCommand {
    direction: Direction,
    main_config: PathBuf,
    folder: PathBuf,
    ctx: AppContext,
}

impl BatchCommand {
    pub fn new(direction: Direction, main_config: PathBuf, folder: PathBuf, ctx: AppContext) -> Self {
        Self {
            direction,
            main_config,
            folder,
            ctx,
        }
    }
}

#[async_trait::async_trait]
impl Command for BatchCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();

        let main = MainConfig::load(&self.main_config)?;
        print_line(&style.success(&format!(
            "Loaded main config from {}",
            self.main_config.display()
        )));
        print_line(&style.key_value("Stream processor prefix", &main.processor_prefix));
        print_line(&style.key_value("Kafka connection", &main.queue_connection_name));
        print_line(&style.key_value("MongoDB connection", &main.database_connection_name));

        info!(direction = %self.direction, folder = %self.folder.display(), "Starting batch");
        let report = self
            .ctx
            .orchestrator()?
            .run(self.direction, &main, &self.folder)
            .await?;

        for line in render_report(&style, &report) {
            print_line(&line);
        }
        Ok(())
    }
}

/// Per-file outcomes followed by the summary table
pub fn render_report(style: &OutputStyle, report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.total_files() == 0 {
        lines.push(style.warning("No connector files found"));
        return lines;
    }

    for (label, result) in [
        ("MongoDB connection", report.database_connection.as_ref()),
        ("Kafka connection", report.queue_connection.as_ref()),
    ] {
        lines.push(match result {
            Some(result) => style.provision(label, result),
            None => style.warning(&format!("{} not attempted", label)),
        });
    }

    lines.push(style.section("Connector files"));
    for file in &report.files {
        if let Some(topic) = &file.topic {
            lines.push(style.provision(&format!("{}: topic", file.file_name), topic));
        }

        lines.push(match &file.processor {
            FileOutcome::Invalid(reason) => {
                style.error(&format!("{}: invalid ({})", file.file_name, reason))
            }
            FileOutcome::Skipped(reason) => {
                style.warning(&format!("{}: processor skipped ({})", file.file_name, reason))
            }
            FileOutcome::Attempted(result) => {
                style.provision(&format!("{}: processor", file.file_name), result)
            }
        });
    }

    lines.push(style.section("Summary"));
    lines.extend(report.summary_lines().iter().map(|l| style.list_item(l)));
    lines
}
