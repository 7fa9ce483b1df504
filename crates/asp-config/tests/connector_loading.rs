use asp_config::{ConfigError, ConnectorConfig, Direction, OffsetReset, Topics};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn loads_sink_file_and_names_origin_in_errors() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("orders.json");
    std::fs::write(
        &good,
        json!({
            "kafka.api.key": "key",
            "kafka.api.secret": "secret",
            "input.data.format": "JSON",
            "connection.user": "svc",
            "connection.password": "pw",
            "topics": "orders",
            "database": "shop",
            "collection": "orders",
            "consumer.override.auto.offset.reset": "earliest"
        })
        .to_string(),
    )
    .unwrap();

    match ConnectorConfig::load(Direction::Sink, &good).unwrap() {
        ConnectorConfig::Sink(sink) => {
            assert_eq!(sink.topics, Topics::One("orders".to_string()));
            assert_eq!(sink.offset_reset, Some(OffsetReset::Earliest));
        }
        other => panic!("expected sink config, got {:?}", other),
    }

    let bad = dir.path().join("broken.json");
    std::fs::write(&bad, json!({"kafka.api.key": "key"}).to_string()).unwrap();
    let err = ConnectorConfig::load(Direction::Sink, &bad).unwrap_err();
    assert!(err.to_string().contains("broken.json"));
}

#[test]
fn source_file_validated_as_sink_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.json");
    std::fs::write(
        &path,
        json!({
            "kafka.api.key": "key",
            "kafka.api.secret": "secret",
            "topic.prefix": "cdc",
            "database": "app",
            "collection": "users",
            "connection.user": "svc",
            "connection.password": "pw"
        })
        .to_string(),
    )
    .unwrap();

    assert!(ConnectorConfig::load(Direction::Source, &path).is_ok());
    assert!(matches!(
        ConnectorConfig::load(Direction::Sink, &path),
        Err(ConfigError::MissingField { .. })
    ));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        ConnectorConfig::load(Direction::Source, &path),
        Err(ConfigError::Parse { .. })
    ));
}
