//! Per-connector configuration (one file per streaming direction)

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{ConfigError, Result},
    json_store::load_json_value,
    validation::{as_object, optional_str, require_str},
};

/// Streaming direction of a connector batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Database change stream into a queue topic
    Source,
    /// Queue topic(s) merged into a database collection
    Sink,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Source => "source",
            Direction::Sink => "sink",
        }
    }

    /// Built-in database role the shared database connection runs as
    pub fn database_role(&self) -> &'static str {
        match self {
            Direction::Source => "readAnyDatabase",
            Direction::Sink => "readWriteAnyDatabase",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "source" => Ok(Direction::Source),
            "sink" => Ok(Direction::Sink),
            other => Err(ConfigError::InvalidField {
                field: "processor_type".to_string(),
                origin: "request".to_string(),
                message: format!("must be 'source' or 'sink', got '{other}'"),
            }),
        }
    }
}

/// Consumer offset policy for sink processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetReset {
    Earliest,
    Latest,
}

impl OffsetReset {
    pub fn as_str(&self) -> &'static str {
        match self {
            OffsetReset::Earliest => "earliest",
            OffsetReset::Latest => "latest",
        }
    }
}

impl FromStr for OffsetReset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, String> {
        match s {
            "earliest" => Ok(OffsetReset::Earliest),
            "latest" => Ok(OffsetReset::Latest),
            other => Err(format!("must be 'earliest' or 'latest', got '{other}'")),
        }
    }
}

/// One topic or a non-empty list of topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Topics {
    One(String),
    Many(Vec<String>),
}

impl Topics {
    /// All topic names in order
    pub fn names(&self) -> Vec<&str> {
        match self {
            Topics::One(name) => vec![name.as_str()],
            Topics::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    fn from_value(value: Option<&Value>, origin: &str) -> Result<Self> {
        let invalid = |message: &str| ConfigError::InvalidField {
            field: "topics".to_string(),
            origin: origin.to_string(),
            message: message.to_string(),
        };

        match value {
            None => Err(ConfigError::MissingField {
                field: "topics".to_string(),
                origin: origin.to_string(),
            }),
            Some(Value::String(name)) if name.trim().is_empty() => {
                Err(invalid("topic name cannot be empty"))
            }
            Some(Value::String(name)) => Ok(Topics::One(name.clone())),
            Some(Value::Array(items)) if items.is_empty() => {
                Err(invalid("'topics' array cannot be empty"))
            }
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid("every topic must be a string"))
                })
                .collect::<Result<Vec<_>>>()
                .map(Topics::Many),
            Some(_) => Err(invalid("'topics' field must be a string or array")),
        }
    }
}

/// Kafka API credentials
#[derive(Clone, PartialEq, Eq)]
pub struct QueueCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for QueueCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueCredentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"****")
            .finish()
    }
}

/// Database user the stream processor shell authenticates as
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseCredentials {
    pub user: String,
    pub password: String,
}

impl fmt::Debug for DatabaseCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseCredentials")
            .field("user", &self.user)
            .field("password", &"****")
            .finish()
    }
}

/// Database → queue connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConnectorConfig {
    pub queue_credentials: QueueCredentials,
    pub topic_prefix: String,
    pub database: String,
    pub collection: String,
    pub database_credentials: DatabaseCredentials,
}

impl SourceConnectorConfig {
    pub const REQUIRED_FIELDS: [&'static str; 7] = [
        "kafka.api.key",
        "kafka.api.secret",
        "topic.prefix",
        "database",
        "collection",
        "connection.user",
        "connection.password",
    ];

    pub fn from_value(value: &Value, origin: &str) -> Result<Self> {
        let obj = as_object(value, origin)?;
        for field in Self::REQUIRED_FIELDS {
            require_str(obj, field, origin)?;
        }

        Ok(Self {
            queue_credentials: queue_credentials(obj, origin)?,
            topic_prefix: owned(obj, "topic.prefix", origin)?,
            database: owned(obj, "database", origin)?,
            collection: owned(obj, "collection", origin)?,
            database_credentials: database_credentials(obj, origin)?,
        })
    }

    /// Topic the source processor emits to: `prefix.database.collection`
    pub fn topic_name(&self) -> String {
        format!("{}.{}.{}", self.topic_prefix, self.database, self.collection)
    }
}

/// Queue → database connector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkConnectorConfig {
    pub queue_credentials: QueueCredentials,
    pub input_format: String,
    pub database_credentials: DatabaseCredentials,
    pub topics: Topics,
    pub database: String,
    pub collection: String,
    pub offset_reset: Option<OffsetReset>,
}

impl SinkConnectorConfig {
    pub const REQUIRED_FIELDS: [&'static str; 8] = [
        "kafka.api.key",
        "kafka.api.secret",
        "input.data.format",
        "connection.user",
        "connection.password",
        "topics",
        "database",
        "collection",
    ];

    pub const OFFSET_RESET_FIELD: &'static str = "consumer.override.auto.offset.reset";

    pub fn from_value(value: &Value, origin: &str) -> Result<Self> {
        let obj = as_object(value, origin)?;
        for field in Self::REQUIRED_FIELDS {
            if field == "topics" {
                if !obj.contains_key(field) {
                    return Err(ConfigError::MissingField {
                        field: field.to_string(),
                        origin: origin.to_string(),
                    });
                }
                continue;
            }
            require_str(obj, field, origin)?;
        }

        let topics = Topics::from_value(obj.get("topics"), origin)?;

        // An empty string is treated like an absent policy.
        let offset_reset = match optional_str(obj, Self::OFFSET_RESET_FIELD, origin)? {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<OffsetReset>().map_err(|message| {
                ConfigError::InvalidField {
                    field: Self::OFFSET_RESET_FIELD.to_string(),
                    origin: origin.to_string(),
                    message,
                }
            })?),
        };

        Ok(Self {
            queue_credentials: queue_credentials(obj, origin)?,
            input_format: owned(obj, "input.data.format", origin)?,
            database_credentials: database_credentials(obj, origin)?,
            topics,
            database: owned(obj, "database", origin)?,
            collection: owned(obj, "collection", origin)?,
            offset_reset,
        })
    }
}

/// A validated connector config of either direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorConfig {
    Source(SourceConnectorConfig),
    Sink(SinkConnectorConfig),
}

impl ConnectorConfig {
    /// Validate a raw value for the given direction
    pub fn from_value(direction: Direction, value: &Value, origin: &str) -> Result<Self> {
        match direction {
            Direction::Source => SourceConnectorConfig::from_value(value, origin).map(Self::Source),
            Direction::Sink => SinkConnectorConfig::from_value(value, origin).map(Self::Sink),
        }
    }

    /// Load a file and validate it for the given direction
    pub fn load<P: AsRef<Path>>(direction: Direction, path: P) -> Result<Self> {
        let path = path.as_ref();
        let origin = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let value = load_json_value(path)?;
        Self::from_value(direction, &value, &origin)
    }

    pub fn queue_credentials(&self) -> &QueueCredentials {
        match self {
            ConnectorConfig::Source(c) => &c.queue_credentials,
            ConnectorConfig::Sink(c) => &c.queue_credentials,
        }
    }

    pub fn database_credentials(&self) -> &DatabaseCredentials {
        match self {
            ConnectorConfig::Source(c) => &c.database_credentials,
            ConnectorConfig::Sink(c) => &c.database_credentials,
        }
    }

    pub fn database(&self) -> &str {
        match self {
            ConnectorConfig::Source(c) => &c.database,
            ConnectorConfig::Sink(c) => &c.database,
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            ConnectorConfig::Source(c) => &c.collection,
            ConnectorConfig::Sink(c) => &c.collection,
        }
    }
}

fn owned(obj: &Map<String, Value>, field: &str, origin: &str) -> Result<String> {
    require_str(obj, field, origin).map(str::to_string)
}

fn queue_credentials(obj: &Map<String, Value>, origin: &str) -> Result<QueueCredentials> {
    Ok(QueueCredentials {
        api_key: owned(obj, "kafka.api.key", origin)?,
        api_secret: owned(obj, "kafka.api.secret", origin)?,
    })
}

fn database_credentials(obj: &Map<String, Value>, origin: &str) -> Result<DatabaseCredentials> {
    Ok(DatabaseCredentials {
        user: owned(obj, "connection.user", origin)?,
        password: owned(obj, "connection.password", origin)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source() -> Value {
        json!({
            "kafka.api.key": "k",
            "kafka.api.secret": "s",
            "topic.prefix": "pfx",
            "database": "db",
            "collection": "coll",
            "connection.user": "u",
            "connection.password": "p",
            "tasks.max": "1"
        })
    }

    fn sink() -> Value {
        json!({
            "kafka.api.key": "k",
            "kafka.api.secret": "s",
            "input.data.format": "JSON",
            "connection.user": "u",
            "connection.password": "p",
            "topics": ["t1", "t2"],
            "database": "db",
            "collection": "coll"
        })
    }

    #[test]
    fn test_source_config() {
        let config = SourceConnectorConfig::from_value(&source(), "a.json").unwrap();
        assert_eq!(config.topic_name(), "pfx.db.coll");
        assert_eq!(config.queue_credentials.api_key, "k");
        assert_eq!(config.database_credentials.user, "u");
    }

    #[test]
    fn test_source_missing_each_field() {
        for field in SourceConnectorConfig::REQUIRED_FIELDS {
            let mut value = source();
            value.as_object_mut().unwrap().remove(field);
            let err = SourceConnectorConfig::from_value(&value, "a.json").unwrap_err();
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn test_sink_topics_string_or_list() {
        let config = SinkConnectorConfig::from_value(&sink(), "b.json").unwrap();
        assert_eq!(config.topics, Topics::Many(vec!["t1".into(), "t2".into()]));

        let mut value = sink();
        value["topics"] = json!("orders");
        let config = SinkConnectorConfig::from_value(&value, "b.json").unwrap();
        assert_eq!(config.topics.names(), vec!["orders"]);
    }

    #[test]
    fn test_sink_rejects_bad_topics() {
        for bad in [json!([]), json!(7), json!({"t": 1}), json!(["ok", 3]), json!("")] {
            let mut value = sink();
            value["topics"] = bad;
            assert!(SinkConnectorConfig::from_value(&value, "b.json").is_err());
        }
    }

    #[test]
    fn test_sink_offset_reset() {
        let mut value = sink();
        value[SinkConnectorConfig::OFFSET_RESET_FIELD] = json!("latest");
        let config = SinkConnectorConfig::from_value(&value, "b.json").unwrap();
        assert_eq!(config.offset_reset, Some(OffsetReset::Latest));

        value[SinkConnectorConfig::OFFSET_RESET_FIELD] = json!("newest");
        let err = SinkConnectorConfig::from_value(&value, "b.json").unwrap_err();
        assert_eq!(err.field(), Some(SinkConnectorConfig::OFFSET_RESET_FIELD));
    }

    #[test]
    fn test_direction_parsing_and_roles() {
        assert_eq!("source".parse::<Direction>().unwrap(), Direction::Source);
        assert_eq!("sink".parse::<Direction>().unwrap(), Direction::Sink);
        assert!("both".parse::<Direction>().is_err());
        assert_eq!(Direction::Source.database_role(), "readAnyDatabase");
        assert_eq!(Direction::Sink.database_role(), "readWriteAnyDatabase");
    }

    #[test]
    fn test_credentials_debug_redacted() {
        let config = ConnectorConfig::from_value(Direction::Sink, &sink(), "b.json").unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("api_secret: \"s\""));
        assert!(!rendered.contains("password: \"p\""));
    }

    #[test]
    fn test_topics_serialize_untagged() {
        assert_eq!(serde_json::to_value(Topics::One("a".into())).unwrap(), json!("a"));
        assert_eq!(
            serde_json::to_value(Topics::Many(vec!["a".into(), "b".into()])).unwrap(),
            json!(["a", "b"])
        );
    }
}
