//! Static operation registry
//!
//! Each entry maps an operation name to its parameter schema and an
//! invocation thunk. `asp ops run <name> <config.json>` looks the name up,
//! checks the JSON object against the schema and calls the thunk.

use futures::future::BoxFuture;
use serde_json::{json, Map, Value};
use tracing::debug;

use asp_config::{DatabaseCredentials, Direction, OffsetReset, QueueCredentials, Topics};
use asp_provision::{
    build_sink_pipeline, build_source_pipeline, processor_name, AuthGate, ConnectionProvisioner,
    ConnectionScope, Pipeline, ProcessOptions, ProcessorProvisioner, ProvisionResult,
    TopicProvisioner,
};

use crate::context::AppContext;
use crate::error::{CliError, CliResult};

/// JSON type a parameter must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Bool,
    /// A string or an array of strings
    StringOrList,
    Array,
}

impl ParamKind {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Bool => value.is_boolean(),
            ParamKind::StringOrList => {
                value.is_string()
                    || value
                        .as_array()
                        .is_some_and(|items| items.iter().all(Value::is_string))
            }
            ParamKind::Array => value.is_array(),
        }
    }

    fn placeholder(&self) -> Value {
        match self {
            ParamKind::String => json!("your_value_here"),
            ParamKind::Bool => json!(false),
            ParamKind::StringOrList => json!(["item1", "item2"]),
            ParamKind::Array => json!([{"key": "value"}]),
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            ParamKind::String => "string",
            ParamKind::Bool => "boolean",
            ParamKind::StringOrList => "string or array of strings",
            ParamKind::Array => "array",
        }
    }
}

/// One parameter of an operation
#[derive(Debug, Clone, Copy)]
pub struct Param {
    pub name: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    /// Value used when an optional parameter is absent
    pub default: Option<&'static str>,
    pub description: &'static str,
}

const fn required(name: &'static str, kind: ParamKind, description: &'static str) -> Param {
    Param {
        name,
        kind,
        required: true,
        default: None,
        description,
    }
}

const fn optional(
    name: &'static str,
    kind: ParamKind,
    default: Option<&'static str>,
    description: &'static str,
) -> Param {
    Param {
        name,
        kind,
        required: false,
        default,
        description,
    }
}

/// What an operation reports back
#[derive(Debug, Clone, PartialEq)]
pub struct OpOutcome {
    pub success: bool,
    pub message: String,
    pub details: Option<Value>,
}

impl OpOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    fn from_provision(result: ProvisionResult) -> Self {
        let message = match result.failure() {
            Some(failure) => format!("{}: failed ({})", result.resource, failure),
            None => format!("{}: {}", result.resource, result.status_label()),
        };
        Self {
            success: result.is_success(),
            message,
            details: None,
        }
    }
}

pub type OpFuture<'a> = BoxFuture<'a, CliResult<OpOutcome>>;
pub type Invoke = for<'a> fn(&'a AppContext, &'a Map<String, Value>) -> OpFuture<'a>;

/// Registered operation
pub struct Operation {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [Param],
    invoke: Invoke,
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl Operation {
    /// Check `params` against the schema
    pub fn validate(&self, params: &Map<String, Value>) -> CliResult<()> {
        for param in self.params {
            match params.get(param.name) {
                None | Some(Value::Null) if param.required => {
                    return Err(CliError::MissingParameter {
                        operation: self.name.to_string(),
                        param: param.name.to_string(),
                    });
                }
                None | Some(Value::Null) => {}
                Some(value) if !param.kind.accepts(value) => {
                    return Err(CliError::InvalidParameter {
                        operation: self.name.to_string(),
                        param: param.name.to_string(),
                        message: format!("expected {}", param.kind.type_name()),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Validate then run
    pub async fn invoke(&self, ctx: &AppContext, params: &Map<String, Value>) -> CliResult<OpOutcome> {
        self.validate(params)?;
        debug!(operation = self.name, "Invoking operation");
        (self.invoke)(ctx, params).await
    }

    /// Example config with every parameter filled in
    pub fn template(&self) -> Map<String, Value> {
        self.params
            .iter()
            .map(|param| {
                let value = match param.default {
                    Some(default) => json!(default),
                    None => param.kind.placeholder(),
                };
                (param.name.to_string(), value)
            })
            .collect()
    }
}

const CONNECTION_SCOPE: [Param; 2] = [
    required("group_id", ParamKind::String, "Project id on the database platform"),
    required("tenant_name", ParamKind::String, "Stream processing instance name"),
];

static OPERATIONS: &[Operation] = &[
    Operation {
        name: "check_auth",
        description: "Check Atlas CLI authentication, offering an interactive login",
        params: &[],
        invoke: check_auth,
    },
    Operation {
        name: "create_mongodb_connection",
        description: "Create a database connection on the stream processing instance",
        params: &[
            CONNECTION_SCOPE[0],
            CONNECTION_SCOPE[1],
            required("cluster_name", ParamKind::String, "Database cluster to connect"),
            required("connection_name", ParamKind::String, "Name of the new connection"),
            optional(
                "role_name",
                ParamKind::String,
                Some("readAnyDatabase"),
                "Built-in role the connection executes as",
            ),
        ],
        invoke: create_mongodb_connection,
    },
    Operation {
        name: "create_kafka_connection",
        description: "Create a Kafka connection on the stream processing instance",
        params: &[
            CONNECTION_SCOPE[0],
            CONNECTION_SCOPE[1],
            required("connection_name", ParamKind::String, "Name of the new connection"),
            required("confluent_rest_endpoint", ParamKind::String, "Kafka REST endpoint"),
            required("kafka_api_key", ParamKind::String, "Kafka API key"),
            required("kafka_api_secret", ParamKind::String, "Kafka API secret"),
        ],
        invoke: create_kafka_connection,
    },
    Operation {
        name: "create_topic",
        description: "Create a Kafka topic through the REST API",
        params: &[
            required("rest_endpoint", ParamKind::String, "Kafka REST endpoint"),
            required("cluster_id", ParamKind::String, "Kafka cluster id"),
            required("api_key", ParamKind::String, "Kafka API key"),
            required("api_secret", ParamKind::String, "Kafka API secret"),
            required("topic_name", ParamKind::String, "Topic to create"),
        ],
        invoke: create_topic,
    },
    Operation {
        name: "create_stream_processor",
        description: "Create a named source or sink stream processor",
        params: &[
            required("connection_user", ParamKind::String, "Stream processing user"),
            required("connection_password", ParamKind::String, "Stream processing password"),
            required("stream_processor_url", ParamKind::String, "Stream processing instance URL"),
            required("stream_processor_prefix", ParamKind::String, "Processor name prefix"),
            required("kafka_connection_name", ParamKind::String, "Kafka connection name"),
            required("mongodb_connection_name", ParamKind::String, "Database connection name"),
            required("database", ParamKind::String, "Database name"),
            required("collection", ParamKind::String, "Collection name"),
            required("processor_type", ParamKind::String, "Either 'source' or 'sink'"),
            optional("topic_prefix", ParamKind::String, None, "Topic prefix (source)"),
            optional("topics", ParamKind::StringOrList, None, "Topic or topics to read (sink)"),
            optional(
                "auto_offset_reset",
                ParamKind::String,
                None,
                "'earliest' or 'latest' (sink)",
            ),
        ],
        invoke: create_stream_processor,
    },
    Operation {
        name: "run_pipeline",
        description: "Run an ad-hoc pipeline once with sp.process",
        params: &[
            required("connection_user", ParamKind::String, "Stream processing user"),
            required("connection_password", ParamKind::String, "Stream processing password"),
            required("stream_processor_url", ParamKind::String, "Stream processing instance URL"),
            required("pipeline", ParamKind::Array, "Pipeline stages"),
            optional("dlq", ParamKind::String, None, "Dead-letter target"),
            optional("dry_run", ParamKind::Bool, None, "Validate without running"),
        ],
        invoke: run_pipeline,
    },
    Operation {
        name: "execute_remote_script",
        description: "Evaluate a script on the stream processing instance",
        params: &[
            required("connection_user", ParamKind::String, "Stream processing user"),
            required("connection_password", ParamKind::String, "Stream processing password"),
            required("stream_processor_url", ParamKind::String, "Stream processing instance URL"),
            required("script", ParamKind::String, "Script to evaluate"),
        ],
        invoke: execute_remote_script,
    },
];

/// Every registered operation
pub fn operations() -> &'static [Operation] {
    OPERATIONS
}

/// Look up an operation by name
pub fn find(name: &str) -> CliResult<&'static Operation> {
    OPERATIONS
        .iter()
        .find(|op| op.name == name)
        .ok_or_else(|| CliError::UnknownOperation(name.to_string()))
}

fn str_param<'a>(params: &'a Map<String, Value>, name: &str) -> &'a str {
    params.get(name).and_then(Value::as_str).unwrap_or_default()
}

fn opt_str_param<'a>(params: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn invalid(operation: &str, param: &str, message: impl Into<String>) -> CliError {
    CliError::InvalidParameter {
        operation: operation.to_string(),
        param: param.to_string(),
        message: message.into(),
    }
}

fn database_credentials(params: &Map<String, Value>) -> DatabaseCredentials {
    DatabaseCredentials {
        user: str_param(params, "connection_user").to_string(),
        password: str_param(params, "connection_password").to_string(),
    }
}

fn connection_scope(params: &Map<String, Value>) -> ConnectionScope {
    ConnectionScope {
        project_id: str_param(params, "group_id").to_string(),
        instance_name: str_param(params, "tenant_name").to_string(),
    }
}

fn check_auth<'a>(ctx: &'a AppContext, _params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        match ctx.auth_gate().ensure_authenticated().await {
            Ok(()) => Ok(OpOutcome::ok("Authenticated with Atlas CLI")),
            Err(e) => Ok(OpOutcome {
                success: false,
                message: e.to_string(),
                details: None,
            }),
        }
    })
}

fn create_mongodb_connection<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let role = opt_str_param(params, "role_name").unwrap_or("readAnyDatabase");
        let result = ctx
            .connection_provisioner()
            .provision_database_connection(
                &connection_scope(params),
                str_param(params, "connection_name"),
                str_param(params, "cluster_name"),
                role,
            )
            .await;
        Ok(OpOutcome::from_provision(result))
    })
}

fn create_kafka_connection<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let credentials = QueueCredentials {
            api_key: str_param(params, "kafka_api_key").to_string(),
            api_secret: str_param(params, "kafka_api_secret").to_string(),
        };
        let result = ctx
            .connection_provisioner()
            .provision_queue_connection(
                &connection_scope(params),
                str_param(params, "connection_name"),
                str_param(params, "confluent_rest_endpoint"),
                &credentials,
            )
            .await;
        Ok(OpOutcome::from_provision(result))
    })
}

fn create_topic<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let credentials = QueueCredentials {
            api_key: str_param(params, "api_key").to_string(),
            api_secret: str_param(params, "api_secret").to_string(),
        };
        let result = ctx
            .topic_provisioner()?
            .provision_topic(
                str_param(params, "rest_endpoint"),
                str_param(params, "cluster_id"),
                &credentials,
                str_param(params, "topic_name"),
            )
            .await;
        Ok(OpOutcome::from_provision(result))
    })
}

/// Build the processor name and pipeline for `create_stream_processor`
pub fn stream_processor_pipeline(params: &Map<String, Value>) -> CliResult<(String, Pipeline)> {
    const OP: &str = "create_stream_processor";

    let direction: Direction = str_param(params, "processor_type")
        .parse()
        .map_err(|_| invalid(OP, "processor_type", "expected 'source' or 'sink'"))?;
    let database = str_param(params, "database");
    let collection = str_param(params, "collection");
    let name = processor_name(str_param(params, "stream_processor_prefix"), database, collection);
    let queue_connection = str_param(params, "kafka_connection_name");
    let database_connection = str_param(params, "mongodb_connection_name");

    let pipeline = match direction {
        Direction::Source => {
            let topic_prefix = opt_str_param(params, "topic_prefix").ok_or_else(|| {
                CliError::MissingParameter {
                    operation: OP.to_string(),
                    param: "topic_prefix".to_string(),
                }
            })?;
            build_source_pipeline(
                database_connection,
                queue_connection,
                topic_prefix,
                database,
                collection,
            )
        }
        Direction::Sink => {
            let value = params.get("topics").cloned().unwrap_or(Value::Null);
            if value.is_null() {
                return Err(CliError::MissingParameter {
                    operation: OP.to_string(),
                    param: "topics".to_string(),
                });
            }
            let topics: Topics = serde_json::from_value(value)
                .map_err(|e| invalid(OP, "topics", e.to_string()))?;
            if topics.names().is_empty() || topics.names().iter().any(|name| name.is_empty()) {
                return Err(invalid(OP, "topics", "must name at least one topic"));
            }
            let offset_reset = opt_str_param(params, "auto_offset_reset")
                .map(str::parse::<OffsetReset>)
                .transpose()
                .map_err(|e| invalid(OP, "auto_offset_reset", e))?;
            build_sink_pipeline(
                queue_connection,
                &topics,
                database_connection,
                database,
                collection,
                offset_reset,
            )
        }
    };
    Ok((name, pipeline))
}

fn create_stream_processor<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let (name, pipeline) = stream_processor_pipeline(params)?;
        let result = ctx
            .processor_provisioner()
            .provision_processor(
                &database_credentials(params),
                str_param(params, "stream_processor_url"),
                &name,
                &pipeline,
            )
            .await;
        Ok(OpOutcome::from_provision(result))
    })
}

fn run_pipeline<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let pipeline: Pipeline = serde_json::from_value(params.get("pipeline").cloned().unwrap_or_default())
            .map_err(|e| invalid("run_pipeline", "pipeline", e.to_string()))?;

        let mut options = ProcessOptions::default();
        if let Some(dlq) = opt_str_param(params, "dlq") {
            options = options.with_dlq(dlq);
        }
        if params.get("dry_run").and_then(Value::as_bool).unwrap_or(false) {
            options = options.dry_run();
        }

        let output = ctx
            .processor_provisioner()
            .run_pipeline(
                &database_credentials(params),
                str_param(params, "stream_processor_url"),
                pipeline,
                Some(options),
            )
            .await
            .map_err(|e| CliError::OperationFailed {
                name: "run_pipeline".to_string(),
                message: e.to_string(),
            })?;

        Ok(OpOutcome {
            success: output.success,
            message: if output.success {
                "Pipeline executed".to_string()
            } else {
                format!("Pipeline failed: {}", output.stderr.trim())
            },
            details: None,
        }
        .with_details(json!({"stdout": output.stdout, "stderr": output.stderr})))
    })
}

fn execute_remote_script<'a>(ctx: &'a AppContext, params: &'a Map<String, Value>) -> OpFuture<'a> {
    Box::pin(async move {
        let output = ctx
            .remote_shell()
            .execute_remote_script(
                &database_credentials(params),
                str_param(params, "stream_processor_url"),
                str_param(params, "script"),
            )
            .await
            .map_err(|e| CliError::OperationFailed {
                name: "execute_remote_script".to_string(),
                message: e.to_string(),
            })?;

        Ok(OpOutcome {
            success: output.success,
            message: if output.success {
                "Script executed".to_string()
            } else {
                "Script exited with an error".to_string()
            },
            details: Some(json!({"stdout": output.stdout, "stderr": output.stderr})),
        })
    })
}
