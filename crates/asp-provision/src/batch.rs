//! Batch orchestration over a folder of connector configs
//!
//! Order of work for one batch:
//!
//! 1. authentication gate (failure aborts with no side effects)
//! 2. discovery of `*.json` files in directory-listing order
//! 3. seed selection: the first file that loads and validates
//! 4. shared connections, each provisioned exactly once
//! 5. per-file pass with failure isolation
//!
//! The processor for a file is attempted only when both shared connections
//! ended up created or reused.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use asp_config::{ConnectorConfig, Direction, MainConfig};

use crate::{
    auth::AuthGate,
    error::{BatchError, Result},
    outcome::ProvisionResult,
    pipeline::{build_sink_pipeline, build_source_pipeline, processor_name, Pipeline},
    provisioner::{
        ConnectionProvisioner, ConnectionScope, ProcessorProvisioner, TopicProvisioner,
    },
};

/// Why a valid file's processor was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DatabaseConnectionUnavailable,
    QueueConnectionUnavailable,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DatabaseConnectionUnavailable => {
                f.write_str("database connection not available")
            }
            SkipReason::QueueConnectionUnavailable => f.write_str("Kafka connection not available"),
        }
    }
}

/// Processor outcome for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Load or validation error
    Invalid(String),
    Skipped(SkipReason),
    Attempted(ProvisionResult),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    pub file_name: String,
    /// Per-file topic (source batches only)
    pub topic: Option<ProvisionResult>,
    pub processor: FileOutcome,
}

impl FileReport {
    /// Processor created or reused
    pub fn succeeded(&self) -> bool {
        matches!(&self.processor, FileOutcome::Attempted(result) if result.is_success())
    }
}

/// Structured outcome of one batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub direction: Direction,
    /// `None` only when the folder held no connector files
    pub database_connection: Option<ProvisionResult>,
    /// `None` when no file validated
    pub queue_connection: Option<ProvisionResult>,
    pub files: Vec<FileReport>,
}

impl BatchReport {
    fn empty(direction: Direction) -> Self {
        Self {
            direction,
            database_connection: None,
            queue_connection: None,
            files: Vec::new(),
        }
    }

    pub fn total_files(&self) -> usize {
        self.files.len()
    }

    pub fn processors_succeeded(&self) -> usize {
        self.files.iter().filter(|f| f.succeeded()).count()
    }

    pub fn invalid_files(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.processor, FileOutcome::Invalid(_)))
            .count()
    }

    pub fn topics_succeeded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.topic.as_ref().is_some_and(ProvisionResult::is_success))
            .count()
    }

    /// Both shared connections are created or reused
    pub fn shared_connections_ready(&self) -> bool {
        let ready = |c: &Option<ProvisionResult>| c.as_ref().is_some_and(ProvisionResult::is_success);
        ready(&self.database_connection) && ready(&self.queue_connection)
    }

    /// Tabulated summary, one line per aggregate
    pub fn summary_lines(&self) -> Vec<String> {
        let total = self.total_files();
        let mut lines = Vec::new();

        if self.direction == Direction::Source {
            lines.push(format!(
                "Kafka topics: {}/{} created successfully",
                self.topics_succeeded(),
                total
            ));
        }
        lines.push(format!(
            "MongoDB {} connection: {}",
            self.direction,
            shared_status(self.database_connection.as_ref())
        ));
        lines.push(format!(
            "Kafka connection: {}",
            shared_status(self.queue_connection.as_ref())
        ));
        lines.push(format!(
            "Stream processors: {}/{} created successfully",
            self.processors_succeeded(),
            total
        ));
        if self.invalid_files() > 0 {
            lines.push(format!("Invalid connector files: {}", self.invalid_files()));
        }
        lines
    }
}

fn shared_status(result: Option<&ProvisionResult>) -> String {
    match result {
        Some(r) if r.is_success() => format!("1/1 {}", r.status_label()),
        Some(_) => "0/1 created successfully".to_string(),
        None => "0/1 not attempted".to_string(),
    }
}

/// `*.json` regular files in `folder`, in directory-listing order
pub fn discover_connector_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let display = folder.display().to_string();
    if !folder.exists() {
        return Err(BatchError::FolderNotFound(display));
    }
    if !folder.is_dir() {
        return Err(BatchError::NotADirectory(display));
    }

    let entries = std::fs::read_dir(folder).map_err(|source| BatchError::ReadFolder {
        path: display.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| BatchError::ReadFolder {
            path: display.clone(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Pipeline for a validated connector config
pub fn connector_pipeline(main: &MainConfig, config: &ConnectorConfig) -> Pipeline {
    match config {
        ConnectorConfig::Source(source) => build_source_pipeline(
            &main.database_connection_name,
            &main.queue_connection_name,
            &source.topic_prefix,
            &source.database,
            &source.collection,
        ),
        ConnectorConfig::Sink(sink) => build_sink_pipeline(
            &main.queue_connection_name,
            &sink.topics,
            &main.database_connection_name,
            &sink.database,
            &sink.collection,
            sink.offset_reset,
        ),
    }
}

/// Runs source and sink batches against injected provisioners
pub struct BatchOrchestrator {
    auth: Arc<dyn AuthGate>,
    connections: Arc<dyn ConnectionProvisioner>,
    topics: Arc<dyn TopicProvisioner>,
    processors: Arc<dyn ProcessorProvisioner>,
}

impl BatchOrchestrator {
    pub fn new(
        auth: Arc<dyn AuthGate>,
        connections: Arc<dyn ConnectionProvisioner>,
        topics: Arc<dyn TopicProvisioner>,
        processors: Arc<dyn ProcessorProvisioner>,
    ) -> Self {
        Self {
            auth,
            connections,
            topics,
            processors,
        }
    }

    pub async fn run(
        &self,
        direction: Direction,
        main: &MainConfig,
        folder: &Path,
    ) -> Result<BatchReport> {
        if let Err(e) = self.auth.ensure_authenticated().await {
            warn!(error = %e, "All processing stopped due to authentication failure");
            return Err(e.into());
        }

        let files = discover_connector_files(folder)?;
        if files.is_empty() {
            info!(folder = %folder.display(), "No .json files found");
            return Ok(BatchReport::empty(direction));
        }
        info!(count = files.len(), %direction, "Found connector files to process");

        let seed = files
            .iter()
            .find_map(|path| ConnectorConfig::load(direction, path).ok());

        let scope = ConnectionScope {
            project_id: main.database_project_id.clone(),
            instance_name: main.database_instance_name.clone(),
        };

        info!(connection = %main.database_connection_name, "Creating shared database connection");
        let database_connection = self
            .connections
            .provision_database_connection(
                &scope,
                &main.database_connection_name,
                &main.database_cluster_name,
                direction.database_role(),
            )
            .await;

        let queue_connection = match &seed {
            Some(seed) => {
                info!(connection = %main.queue_connection_name, "Creating shared Kafka connection");
                Some(
                    self.connections
                        .provision_queue_connection(
                            &scope,
                            &main.queue_connection_name,
                            &main.queue_rest_endpoint,
                            seed.queue_credentials(),
                        )
                        .await,
                )
            }
            None => {
                warn!("No valid connector config; skipping Kafka connection");
                None
            }
        };

        let mut report = BatchReport {
            direction,
            database_connection: Some(database_connection),
            queue_connection,
            files: Vec::with_capacity(files.len()),
        };

        for path in &files {
            let file_report = self.process_file(main, direction, path, &report).await;
            report.files.push(file_report);
        }

        Ok(report)
    }

    async fn process_file(
        &self,
        main: &MainConfig,
        direction: Direction,
        path: &Path,
        report: &BatchReport,
    ) -> FileReport {
        let name = file_name(path);
        info!(file = %name, "Processing connector file");

        let config = match ConnectorConfig::load(direction, path) {
            Ok(config) => config,
            Err(e) => {
                warn!(file = %name, error = %e, "Skipping invalid connector file");
                return FileReport {
                    file_name: name,
                    topic: None,
                    processor: FileOutcome::Invalid(e.to_string()),
                };
            }
        };

        let topic = match &config {
            ConnectorConfig::Source(source) => Some(
                self.topics
                    .provision_topic(
                        &main.queue_rest_endpoint,
                        &main.queue_cluster_id,
                        &source.queue_credentials,
                        &source.topic_name(),
                    )
                    .await,
            ),
            ConnectorConfig::Sink(_) => None,
        };

        let is_ready =
            |c: &Option<ProvisionResult>| c.as_ref().is_some_and(ProvisionResult::is_success);
        let processor = if !is_ready(&report.database_connection) {
            FileOutcome::Skipped(SkipReason::DatabaseConnectionUnavailable)
        } else if !is_ready(&report.queue_connection) {
            FileOutcome::Skipped(SkipReason::QueueConnectionUnavailable)
        } else {
            let processor = processor_name(
                &main.processor_prefix,
                config.database(),
                config.collection(),
            );
            let pipeline = connector_pipeline(main, &config);
            FileOutcome::Attempted(
                self.processors
                    .provision_processor(
                        config.database_credentials(),
                        &main.stream_engine_url,
                        &processor,
                        &pipeline,
                    )
                    .await,
            )
        };

        if let FileOutcome::Skipped(reason) = &processor {
            warn!(file = %name, %reason, "Skipping stream processor creation");
        }

        FileReport {
            file_name: name,
            topic,
            processor,
        }
    }
}
