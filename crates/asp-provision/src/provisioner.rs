//! Provisioner seams used by the batch orchestrator

use async_trait::async_trait;

use asp_config::{DatabaseCredentials, QueueCredentials};

use crate::{outcome::ProvisionResult, pipeline::Pipeline};

/// Project and stream processing instance that connections are created in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionScope {
    pub project_id: String,
    pub instance_name: String,
}

/// Creates (or reuses) stream processing connections
#[async_trait]
pub trait ConnectionProvisioner: Send + Sync {
    /// Connection to a database cluster that runs as a built-in `role`
    async fn provision_database_connection(
        &self,
        scope: &ConnectionScope,
        name: &str,
        cluster_name: &str,
        role: &str,
    ) -> ProvisionResult;

    /// Kafka connection authenticated with `credentials`
    async fn provision_queue_connection(
        &self,
        scope: &ConnectionScope,
        name: &str,
        rest_endpoint: &str,
        credentials: &QueueCredentials,
    ) -> ProvisionResult;
}

/// Creates (or reuses) queue topics
#[async_trait]
pub trait TopicProvisioner: Send + Sync {
    async fn provision_topic(
        &self,
        rest_endpoint: &str,
        cluster_id: &str,
        credentials: &QueueCredentials,
        topic_name: &str,
    ) -> ProvisionResult;
}

/// Creates (or reuses) named stream processors
#[async_trait]
pub trait ProcessorProvisioner: Send + Sync {
    async fn provision_processor(
        &self,
        credentials: &DatabaseCredentials,
        engine_url: &str,
        name: &str,
        pipeline: &Pipeline,
    ) -> ProvisionResult;
}
