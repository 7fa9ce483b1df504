//! Stream processing pipeline definitions
//!
//! A pipeline is an ordered list of stages. Source batches read a collection
//! change stream and emit to a topic; sink batches read topics and merge into
//! a collection. Everything here is pure.
//!
//! Keys the typed stages do not model are kept in each stage's `extra` map
//! and written back unchanged, so a caller-supplied pipeline renders exactly
//! as it was given.

use asp_config::{OffsetReset, Topics};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Database collection reached through a named connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRef {
    pub connection_name: String,
    pub db: String,
    pub coll: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Consumer settings for a topic source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_offset_reset: Option<OffsetReset>,
    /// Other consumer settings such as `group_id`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Topic(s) read through a named queue connection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicSource {
    pub connection_name: String,
    pub topic: Topics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<TopicSourceConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a `$source` stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceStage {
    Collection(CollectionRef),
    Topic(TopicSource),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmitStage {
    pub connection_name: String,
    pub topic: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeStage {
    pub into: CollectionRef,
    /// `on`, `whenMatched`, `whenNotMatched` and the like
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One pipeline stage
///
/// Stages other than `$source`, `$emit` and `$merge` are carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "$source")]
    Source(SourceStage),
    #[serde(rename = "$emit")]
    Emit(EmitStage),
    #[serde(rename = "$merge")]
    Merge(MergeStage),
    #[serde(untagged)]
    Other(Value),
}

/// Ordered stage sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pipeline(Vec<Stage>);

impl Pipeline {
    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

impl From<Vec<Stage>> for Pipeline {
    fn from(stages: Vec<Stage>) -> Self {
        Self(stages)
    }
}

/// Options for a one-off `sp.process` run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOptions {
    /// Dead-letter target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dlq: Option<String>,
    #[serde(rename = "dryRun", default, skip_serializing_if = "is_false")]
    pub dry_run: bool,
}

impl ProcessOptions {
    pub fn with_dlq(mut self, dlq: impl Into<String>) -> Self {
        self.dlq = Some(dlq.into());
        self
    }

    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Nothing set; the options argument can be omitted
    pub fn is_empty(&self) -> bool {
        self.dlq.is_none() && !self.dry_run
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Deterministic processor name: `prefix_database_collection`
pub fn processor_name(prefix: &str, database: &str, collection: &str) -> String {
    format!("{}_{}_{}", prefix, database, collection)
}

/// Topic a source processor emits to: `prefix.database.collection`
pub fn source_topic_name(topic_prefix: &str, database: &str, collection: &str) -> String {
    format!("{}.{}.{}", topic_prefix, database, collection)
}

/// Collection change stream → topic
pub fn build_source_pipeline(
    database_connection: &str,
    queue_connection: &str,
    topic_prefix: &str,
    database: &str,
    collection: &str,
) -> Pipeline {
    build_pipeline([
        Stage::Source(SourceStage::Collection(CollectionRef {
            connection_name: database_connection.to_string(),
            db: database.to_string(),
            coll: collection.to_string(),
            extra: Map::new(),
        })),
        Stage::Emit(EmitStage {
            connection_name: queue_connection.to_string(),
            topic: source_topic_name(topic_prefix, database, collection),
            extra: Map::new(),
        }),
    ])
}

/// Topic(s) → collection merge
///
/// The `config` block on the source stage only appears when an offset policy
/// is given.
pub fn build_sink_pipeline(
    queue_connection: &str,
    topics: &Topics,
    database_connection: &str,
    database: &str,
    collection: &str,
    offset_reset: Option<OffsetReset>,
) -> Pipeline {
    build_pipeline([
        Stage::Source(SourceStage::Topic(TopicSource {
            connection_name: queue_connection.to_string(),
            topic: topics.clone(),
            config: offset_reset.map(|offset| TopicSourceConfig {
                auto_offset_reset: Some(offset),
                extra: Map::new(),
            }),
            extra: Map::new(),
        })),
        Stage::Merge(MergeStage {
            into: CollectionRef {
                connection_name: database_connection.to_string(),
                db: database.to_string(),
                coll: collection.to_string(),
                extra: Map::new(),
            },
            extra: Map::new(),
        }),
    ])
}

/// Compose a custom pipeline from arbitrary stages
pub fn build_pipeline(stages: impl IntoIterator<Item = Stage>) -> Pipeline {
    Pipeline(stages.into_iter().collect())
}
