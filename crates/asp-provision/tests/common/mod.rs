#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use serde_json::{json, Value};

use asp_config::{DatabaseCredentials, MainConfig, QueueCredentials};
use asp_process::{CommandRunner, ProcessConfig, ProcessOutput};
use asp_provision::{
    AuthError, AuthGate, ConnectionProvisioner, ConnectionScope, Pipeline, ProcessorProvisioner,
    ProvisionFailure, ProvisionResult, TopicProvisioner,
};

/// Runner that answers every call with a closure and records the configs
pub struct FnRunner<F> {
    respond: F,
    pub calls: Mutex<Vec<ProcessConfig>>,
}

impl<F> FnRunner<F>
where
    F: Fn(&ProcessConfig) -> asp_process::Result<ProcessOutput> + Send + Sync,
{
    pub fn new(respond: F) -> Arc<Self> {
        Arc::new(Self {
            respond,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ProcessConfig> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> CommandRunner for FnRunner<F>
where
    F: Fn(&ProcessConfig) -> asp_process::Result<ProcessOutput> + Send + Sync,
{
    async fn run(&self, config: ProcessConfig) -> asp_process::Result<ProcessOutput> {
        let result = (self.respond)(&config);
        self.calls.lock().unwrap().push(config);
        result
    }
}

pub fn main_config() -> MainConfig {
    MainConfig::from_value(&main_config_value()).unwrap()
}

pub fn main_config_value() -> Value {
    json!({
        "confluent-cluster-id": "lkc-1",
        "confluent-rest-endpoint": "https://pkc-1.confluent.cloud:443",
        "mongodb-stream-processor-instance-url": "mongodb://sp.example.net",
        "stream-processor-prefix": "managed",
        "kafka-connection-name": "kafka-conn",
        "mongodb-connection-name": "mongo-conn",
        "mongodb-cluster-name": "Cluster0",
        "mongodb-group-id": "proj-1",
        "mongodb-tenant-name": "sp-instance"
    })
}

pub fn sink_connector(collection: &str) -> Value {
    json!({
        "kafka.api.key": format!("key-{collection}"),
        "kafka.api.secret": "secret",
        "input.data.format": "JSON",
        "connection.user": "svc",
        "connection.password": "pw",
        "topics": ["orders"],
        "database": "shop",
        "collection": collection,
        "consumer.override.auto.offset.reset": "earliest"
    })
}

pub fn source_connector(collection: &str) -> Value {
    json!({
        "kafka.api.key": format!("key-{collection}"),
        "kafka.api.secret": "secret",
        "topic.prefix": "cdc",
        "database": "shop",
        "collection": collection,
        "connection.user": "svc",
        "connection.password": "pw"
    })
}

pub struct AllowAuth;

#[async_trait]
impl AuthGate for AllowAuth {
    async fn ensure_authenticated(&self) -> Result<(), AuthError> {
        Ok(())
    }
}

pub struct DenyAuth;

#[async_trait]
impl AuthGate for DenyAuth {
    async fn ensure_authenticated(&self) -> Result<(), AuthError> {
        Err(AuthError::Declined)
    }
}

/// Programmable outcome for a fake provisioner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Create,
    Reuse,
    Fail,
}

impl Behavior {
    fn result(self, resource: &str) -> ProvisionResult {
        match self {
            Behavior::Create => ProvisionResult::created(resource),
            Behavior::Reuse => ProvisionResult::reused(resource),
            Behavior::Fail => ProvisionResult::failed(
                resource,
                ProvisionFailure::Rejected {
                    message: "boom".to_string(),
                },
            ),
        }
    }
}

pub struct FakeConnections {
    pub database: Behavior,
    pub queue: Behavior,
    pub database_calls: Mutex<Vec<(String, String)>>,
    pub queue_calls: Mutex<Vec<QueueCredentials>>,
}

impl FakeConnections {
    pub fn new(database: Behavior, queue: Behavior) -> Arc<Self> {
        Arc::new(Self {
            database,
            queue,
            database_calls: Mutex::new(Vec::new()),
            queue_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn total_calls(&self) -> usize {
        self.database_calls.lock().unwrap().len() + self.queue_calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ConnectionProvisioner for FakeConnections {
    async fn provision_database_connection(
        &self,
        _scope: &ConnectionScope,
        name: &str,
        _cluster_name: &str,
        role: &str,
    ) -> ProvisionResult {
        self.database_calls
            .lock()
            .unwrap()
            .push((name.to_string(), role.to_string()));
        self.database.result(name)
    }

    async fn provision_queue_connection(
        &self,
        _scope: &ConnectionScope,
        name: &str,
        _rest_endpoint: &str,
        credentials: &QueueCredentials,
    ) -> ProvisionResult {
        self.queue_calls.lock().unwrap().push(credentials.clone());
        self.queue.result(name)
    }
}

pub struct FakeTopics {
    pub behavior: Behavior,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTopics {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TopicProvisioner for FakeTopics {
    async fn provision_topic(
        &self,
        _rest_endpoint: &str,
        _cluster_id: &str,
        _credentials: &QueueCredentials,
        topic_name: &str,
    ) -> ProvisionResult {
        self.calls.lock().unwrap().push(topic_name.to_string());
        self.behavior.result(topic_name)
    }
}

/// Remembers which processors exist so a second run reuses them
pub struct FakeProcessors {
    pub existing: Mutex<Vec<String>>,
    pub calls: Mutex<Vec<(String, Pipeline)>>,
    pub attempts: AtomicUsize,
}

impl FakeProcessors {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            existing: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProcessorProvisioner for FakeProcessors {
    async fn provision_processor(
        &self,
        _credentials: &DatabaseCredentials,
        _engine_url: &str,
        name: &str,
        pipeline: &Pipeline,
    ) -> ProvisionResult {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), pipeline.clone()));

        let mut existing = self.existing.lock().unwrap();
        if existing.iter().any(|n| n == name) {
            ProvisionResult::reused(name)
        } else {
            existing.push(name.to_string());
            ProvisionResult::created(name)
        }
    }
}
