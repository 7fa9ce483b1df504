//! Stream processing connections through the `atlas` CLI

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use asp_config::QueueCredentials;
use asp_process::{CommandRunner, ProcessConfig};

use crate::{
    markers::has_existence_marker,
    outcome::{ProvisionFailure, ProvisionResult},
    provisioner::{ConnectionProvisioner, ConnectionScope},
};

/// Default connection creation timeout
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Kafka bootstrap servers for a Confluent REST endpoint
///
/// `https://pkc-1.confluent.cloud:443` → `pkc-1.confluent.cloud:9092`
pub fn bootstrap_servers(rest_endpoint: &str) -> String {
    rest_endpoint.replace("https://", "").replace(":443", ":9092")
}

/// Descriptor for a cluster connection running as a built-in role
pub fn database_connection_descriptor(cluster_name: &str, role: &str) -> Value {
    json!({
        "type": "Cluster",
        "clusterName": cluster_name,
        "dbRoleToExecute": {
            "role": role,
            "type": "BUILT_IN"
        }
    })
}

/// Descriptor for a SASL/PLAIN Kafka connection
pub fn queue_connection_descriptor(
    name: &str,
    rest_endpoint: &str,
    credentials: &QueueCredentials,
) -> Value {
    json!({
        "name": name,
        "type": "Kafka",
        "authentication": {
            "mechanism": "PLAIN",
            "username": credentials.api_key,
            "password": credentials.api_secret
        },
        "bootstrapServers": bootstrap_servers(rest_endpoint),
        "config": {
            "auto.offset.reset": "earliest",
            "group.id": format!("{}-consumer-group", name)
        },
        "security": {
            "protocol": "SASL_SSL"
        }
    })
}

/// Creates connections with `atlas streams connections create`
#[derive(Clone)]
pub struct AtlasConnectionProvisioner {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    timeout: Duration,
}

impl AtlasConnectionProvisioner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            binary: "atlas".to_string(),
            timeout: DEFAULT_CONNECTION_TIMEOUT,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Write `descriptor` to a scoped temp file and hand it to the CLI
    ///
    /// The temp file is removed when this returns, on every path.
    async fn create(
        &self,
        scope: &ConnectionScope,
        name: &str,
        descriptor: &Value,
    ) -> Result<ProvisionResult, ProvisionFailure> {
        let mut file = NamedTempFile::new()?;
        serde_json::to_writer_pretty(file.as_file_mut(), descriptor)?;
        file.as_file_mut().flush()?;
        let file_path = file.path().to_string_lossy().into_owned();

        let config = ProcessConfig::new(&self.binary)
            .args([
                "streams",
                "connections",
                "create",
                name,
                "--projectId",
                scope.project_id.as_str(),
                "--instance",
                scope.instance_name.as_str(),
                "--file",
                file_path.as_str(),
                "--output",
                "json",
            ])
            .timeout(self.timeout);

        debug!(connection = %name, file = %file_path, "Creating connection");
        let output = self.runner.run(config).await?;

        if output.success() {
            info!(connection = %name, "Connection created");
            Ok(ProvisionResult::created(name))
        } else if has_existence_marker(&output.stderr) {
            info!(connection = %name, "Connection already exists, reusing");
            Ok(ProvisionResult::reused(name))
        } else {
            Err(ProvisionFailure::Rejected {
                message: output.stderr,
            })
        }
    }

    async fn provision(&self, scope: &ConnectionScope, name: &str, descriptor: Value) -> ProvisionResult {
        match self.create(scope, name, &descriptor).await {
            Ok(result) => result,
            Err(failure) => {
                warn!(connection = %name, error = %failure, "Connection creation failed");
                ProvisionResult::failed(name, failure)
            }
        }
    }
}

#[async_trait]
impl ConnectionProvisioner for AtlasConnectionProvisioner {
    async fn provision_database_connection(
        &self,
        scope: &ConnectionScope,
        name: &str,
        cluster_name: &str,
        role: &str,
    ) -> ProvisionResult {
        self.provision(scope, name, database_connection_descriptor(cluster_name, role))
            .await
    }

    async fn provision_queue_connection(
        &self,
        scope: &ConnectionScope,
        name: &str,
        rest_endpoint: &str,
        credentials: &QueueCredentials,
    ) -> ProvisionResult {
        self.provision(
            scope,
            name,
            queue_connection_descriptor(name, rest_endpoint, credentials),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_servers() {
        assert_eq!(
            bootstrap_servers("https://pkc-1.us-east-1.aws.confluent.cloud:443"),
            "pkc-1.us-east-1.aws.confluent.cloud:9092"
        );
        assert_eq!(bootstrap_servers("broker:9092"), "broker:9092");
    }

    #[test]
    fn test_queue_descriptor() {
        let credentials = QueueCredentials {
            api_key: "key".into(),
            api_secret: "secret".into(),
        };
        let descriptor =
            queue_connection_descriptor("kafka-conn", "https://pkc-1.cloud:443", &credentials);

        assert_eq!(descriptor["bootstrapServers"], "pkc-1.cloud:9092");
        assert_eq!(descriptor["config"]["group.id"], "kafka-conn-consumer-group");
        assert_eq!(descriptor["authentication"]["username"], "key");
        assert_eq!(descriptor["security"]["protocol"], "SASL_SSL");
    }

    #[test]
    fn test_database_descriptor() {
        let descriptor = database_connection_descriptor("Cluster0", "readAnyDatabase");
        assert_eq!(
            descriptor,
            json!({
                "type": "Cluster",
                "clusterName": "Cluster0",
                "dbRoleToExecute": {"role": "readAnyDatabase", "type": "BUILT_IN"}
            })
        );
    }
}
