mod common;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use asp_config::QueueCredentials;
use asp_process::{ProcessError, ProcessOutput};
use asp_provision::{
    AtlasConnectionProvisioner, ConnectionProvisioner, ConnectionScope, Outcome, ProvisionFailure,
};
use common::FnRunner;
use serde_json::Value;

fn scope() -> ConnectionScope {
    ConnectionScope {
        project_id: "proj-1".to_string(),
        instance_name: "sp-instance".to_string(),
    }
}

fn credentials() -> QueueCredentials {
    QueueCredentials {
        api_key: "key".to_string(),
        api_secret: "secret".to_string(),
    }
}

#[tokio::test]
async fn database_connection_argv_and_descriptor() {
    let seen: Arc<Mutex<Option<(PathBuf, Value)>>> = Arc::default();
    let sink = seen.clone();
    let runner = FnRunner::new(move |config| {
        let path = PathBuf::from(config.flag_value("--file").unwrap());
        let descriptor: Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        *sink.lock().unwrap() = Some((path, descriptor));
        Ok(ProcessOutput::new(0, "{}", ""))
    });
    let provisioner = AtlasConnectionProvisioner::new(runner.clone());

    let result = provisioner
        .provision_database_connection(&scope(), "mongo-conn", "Cluster0", "readAnyDatabase")
        .await;

    assert_eq!(result.outcome, Outcome::Created);

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let config = &calls[0];
    assert_eq!(config.command, "atlas");
    assert_eq!(
        &config.args[..4],
        &["streams", "connections", "create", "mongo-conn"]
    );
    assert_eq!(config.flag_value("--projectId"), Some("proj-1"));
    assert_eq!(config.flag_value("--instance"), Some("sp-instance"));
    assert_eq!(config.flag_value("--output"), Some("json"));
    assert_eq!(config.timeout, Some(std::time::Duration::from_secs(30)));

    let (path, descriptor) = seen.lock().unwrap().clone().unwrap();
    assert_eq!(descriptor["clusterName"], "Cluster0");
    assert_eq!(descriptor["dbRoleToExecute"]["role"], "readAnyDatabase");
    assert!(!path.exists(), "temp file must be removed after the call");
}

#[tokio::test]
async fn existing_connection_is_reused() {
    let runner = FnRunner::new(|_| {
        Ok(ProcessOutput::new(
            1,
            "",
            "Error: connection name 'kafka-conn' Already Exists",
        ))
    });
    let provisioner = AtlasConnectionProvisioner::new(runner);

    let result = provisioner
        .provision_queue_connection(&scope(), "kafka-conn", "https://pkc-1:443", &credentials())
        .await;

    assert!(result.is_success());
    assert!(!result.was_created());
}

#[tokio::test]
async fn other_errors_fail_and_still_remove_temp_file() {
    let seen: Arc<Mutex<Option<PathBuf>>> = Arc::default();
    let sink = seen.clone();
    let runner = FnRunner::new(move |config| {
        *sink.lock().unwrap() = config.flag_value("--file").map(PathBuf::from);
        Ok(ProcessOutput::new(1, "", "401 unauthorized"))
    });
    let provisioner = AtlasConnectionProvisioner::new(runner);

    let result = provisioner
        .provision_queue_connection(&scope(), "kafka-conn", "https://pkc-1:443", &credentials())
        .await;

    assert!(matches!(
        result.failure(),
        Some(ProvisionFailure::Rejected { message }) if message.contains("unauthorized")
    ));
    let path = seen.lock().unwrap().clone().unwrap();
    assert!(!path.exists());
}

#[tokio::test]
async fn timeout_and_spawn_errors_are_failures() {
    let runner = FnRunner::new(|_| Err(ProcessError::Timeout { seconds: 30 }));
    let provisioner = AtlasConnectionProvisioner::new(runner);
    let result = provisioner
        .provision_database_connection(&scope(), "m", "c", "readAnyDatabase")
        .await;
    assert_eq!(
        result.failure(),
        Some(&ProvisionFailure::Timeout { seconds: 30 })
    );

    let runner = FnRunner::new(|_| {
        Err(ProcessError::SpawnFailed(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "atlas not found",
        )))
    });
    let provisioner = AtlasConnectionProvisioner::new(runner);
    let result = provisioner
        .provision_database_connection(&scope(), "m", "c", "readAnyDatabase")
        .await;
    assert!(matches!(result.failure(), Some(ProvisionFailure::Spawn(_))));
}

#[tokio::test]
async fn queue_descriptor_written_for_cli() {
    let seen: Arc<Mutex<Option<Value>>> = Arc::default();
    let sink = seen.clone();
    let runner = FnRunner::new(move |config| {
        let path = config.flag_value("--file").unwrap();
        *sink.lock().unwrap() =
            Some(serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap());
        Ok(ProcessOutput::new(0, "", ""))
    });
    let provisioner = AtlasConnectionProvisioner::new(runner).with_binary("/opt/atlas");

    provisioner
        .provision_queue_connection(
            &scope(),
            "kafka-conn",
            "https://pkc-1.confluent.cloud:443",
            &credentials(),
        )
        .await;

    let descriptor = seen.lock().unwrap().clone().unwrap();
    assert_eq!(descriptor["name"], "kafka-conn");
    assert_eq!(descriptor["bootstrapServers"], "pkc-1.confluent.cloud:9092");
    assert_eq!(descriptor["authentication"]["password"], "secret");
}
