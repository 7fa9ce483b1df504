//! Process-wide main configuration

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::Result,
    json_store::load_json_value,
    validation::{as_object, require_non_empty_str},
};

const ORIGIN: &str = "main config";

/// Shared settings for one orchestration run
///
/// All nine fields are required and must be non-empty strings. Unknown keys
/// in the file are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainConfig {
    /// Kafka REST endpoint, e.g. `https://pkc-xxx.region.confluent.cloud:443`
    #[serde(rename = "confluent-rest-endpoint")]
    pub queue_rest_endpoint: String,

    #[serde(rename = "confluent-cluster-id")]
    pub queue_cluster_id: String,

    /// Stream processing instance URL handed to the shell
    #[serde(rename = "mongodb-stream-processor-instance-url")]
    pub stream_engine_url: String,

    #[serde(rename = "stream-processor-prefix")]
    pub processor_prefix: String,

    #[serde(rename = "kafka-connection-name")]
    pub queue_connection_name: String,

    #[serde(rename = "mongodb-connection-name")]
    pub database_connection_name: String,

    #[serde(rename = "mongodb-cluster-name")]
    pub database_cluster_name: String,

    /// Project (group) id on the database platform
    #[serde(rename = "mongodb-group-id")]
    pub database_project_id: String,

    /// Stream processing instance (tenant) name
    #[serde(rename = "mongodb-tenant-name")]
    pub database_instance_name: String,
}

impl MainConfig {
    /// On-disk keys that must be present
    pub const REQUIRED_FIELDS: [&'static str; 9] = [
        "confluent-cluster-id",
        "confluent-rest-endpoint",
        "mongodb-stream-processor-instance-url",
        "stream-processor-prefix",
        "kafka-connection-name",
        "mongodb-connection-name",
        "mongodb-cluster-name",
        "mongodb-group-id",
        "mongodb-tenant-name",
    ];

    /// Validate a raw JSON value and convert it
    pub fn from_value(value: &Value) -> Result<Self> {
        validate_main_config(value)?;
        let obj = as_object(value, ORIGIN)?;
        let field = |name: &str| -> Result<String> {
            Ok(require_non_empty_str(obj, name, ORIGIN)?.to_string())
        };

        Ok(Self {
            queue_rest_endpoint: field("confluent-rest-endpoint")?,
            queue_cluster_id: field("confluent-cluster-id")?,
            stream_engine_url: field("mongodb-stream-processor-instance-url")?,
            processor_prefix: field("stream-processor-prefix")?,
            queue_connection_name: field("kafka-connection-name")?,
            database_connection_name: field("mongodb-connection-name")?,
            database_cluster_name: field("mongodb-cluster-name")?,
            database_project_id: field("mongodb-group-id")?,
            database_instance_name: field("mongodb-tenant-name")?,
        })
    }

    /// Load and validate from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let value = load_json_value(path)?;
        Self::from_value(&value)
    }
}

/// Check that every required field is present, a string, and non-empty
///
/// Fails on the first offending field, in `REQUIRED_FIELDS` order.
pub fn validate_main_config(value: &Value) -> Result<()> {
    let obj = as_object(value, ORIGIN)?;
    for field in MainConfig::REQUIRED_FIELDS {
        require_non_empty_str(obj, field, ORIGIN)?;
    }
    Ok(())
}
