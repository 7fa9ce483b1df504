//! Property-based tests for main configuration validation

use asp_config::{validate_main_config, ConfigError, MainConfig};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn valid_main_config() -> Map<String, Value> {
    let value = json!({
        "confluent-cluster-id": "lkc-abc",
        "confluent-rest-endpoint": "https://pkc-1.us-east-1.aws.confluent.cloud:443",
        "mongodb-stream-processor-instance-url": "mongodb://atlas-stream-1.example.net",
        "stream-processor-prefix": "managed",
        "kafka-connection-name": "kafka-conn",
        "mongodb-connection-name": "mongo-conn",
        "mongodb-cluster-name": "Cluster0",
        "mongodb-group-id": "64f0c0ffee",
        "mongodb-tenant-name": "sp-instance"
    });
    value.as_object().cloned().unwrap()
}

/// Removing any one required field fails and names that field.
#[test]
fn removing_any_required_field_is_reported() {
    for field in MainConfig::REQUIRED_FIELDS {
        let mut config = valid_main_config();
        config.remove(field);

        let err = validate_main_config(&Value::Object(config)).unwrap_err();
        assert!(
            matches!(&err, ConfigError::MissingField { field: f, .. } if f == field),
            "expected missing {field}, got {err}"
        );
    }
}

#[test]
fn complete_config_validates() {
    let config = Value::Object(valid_main_config());
    assert!(validate_main_config(&config).is_ok());
    assert!(MainConfig::from_value(&config).is_ok());
}

/// Property: unknown extra keys never change the validation result.
#[test]
fn prop_extra_fields_ignored() {
    proptest!(|(extra in prop::collection::hash_map("[a-z]{1,8}-x", any::<i64>(), 0..8))| {
        let mut config = valid_main_config();
        for (key, value) in extra {
            config.insert(key, json!(value));
        }
        prop_assert!(MainConfig::from_value(&Value::Object(config)).is_ok());
    });
}

/// Property: any subset of removed required fields is rejected.
#[test]
fn prop_any_removed_subset_rejected() {
    proptest!(|(mask in 1u16..(1 << 9))| {
        let mut config = valid_main_config();
        for (i, field) in MainConfig::REQUIRED_FIELDS.iter().enumerate() {
            if mask & (1 << i) != 0 {
                config.remove(*field);
            }
        }
        let err = validate_main_config(&Value::Object(config)).unwrap_err();
        let field = err.field().map(str::to_string).unwrap_or_default();
        let first_removed = MainConfig::REQUIRED_FIELDS
            .iter()
            .enumerate()
            .find(|(i, _)| mask & (1u16 << *i) != 0)
            .map(|(_, f)| f.to_string())
            .unwrap();
        prop_assert_eq!(field, first_removed);
    });
}
