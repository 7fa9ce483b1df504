//! # asp-provision
//!
//! **Purpose**: Idempotent create-or-reuse provisioning of streaming plumbing
//! across a managed database platform and a Kafka platform.
//!
//! ## Features
//!
//! - **Pipeline Builder**: pure source/sink/custom stage sequences
//! - **Connections**: database and Kafka connections through the `atlas` CLI
//! - **Topics**: Confluent REST topic creation with 201/409/40002 handling
//! - **Stream Processors**: typed shell commands evaluated by `mongosh`
//! - **Batch Orchestration**: shared provisioning once, per-file isolation
//! - **Authentication Gate**: nothing runs until the CLI is logged in
//!
//! Every backend sits behind a trait (`ConnectionProvisioner`,
//! `TopicProvisioner`, `ProcessorProvisioner`, `AuthGate`) so the
//! orchestrator can be driven by test doubles.

pub mod auth;
pub mod batch;
pub mod connections;
pub mod error;
pub mod markers;
pub mod outcome;
pub mod pipeline;
pub mod provisioner;
pub mod remote_shell;
pub mod script;
pub mod topics;

pub use auth::{is_affirmative, AtlasCliAuth, AuthError, AuthGate, Prompt, StdinPrompt};
pub use batch::{
    connector_pipeline, discover_connector_files, BatchOrchestrator, BatchReport, FileOutcome,
    FileReport, SkipReason,
};
pub use connections::{
    bootstrap_servers, database_connection_descriptor, queue_connection_descriptor,
    AtlasConnectionProvisioner,
};
pub use error::{BatchError, Result};
pub use markers::has_existence_marker;
pub use outcome::{Outcome, ProvisionFailure, ProvisionResult};
pub use pipeline::{
    build_pipeline, build_sink_pipeline, build_source_pipeline, processor_name,
    source_topic_name, CollectionRef, EmitStage, MergeStage, Pipeline, ProcessOptions,
    SourceStage, Stage, TopicSource, TopicSourceConfig,
};
pub use provisioner::{
    ConnectionProvisioner, ConnectionScope, ProcessorProvisioner, TopicProvisioner,
};
pub use remote_shell::{normalize_engine_url, RemoteShell, ScriptOutput, StreamProcessorProvisioner};
pub use script::ShellCommand;
pub use topics::{topic_request_body, topics_url, ConfluentTopicProvisioner};
