//! Field validators over raw JSON objects

use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};

/// Borrow `value` as a JSON object or fail with `NotAnObject`
pub fn as_object<'a>(value: &'a Value, origin: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ConfigError::NotAnObject(origin.to_string()))
}

/// Require `field` to be present and hold a string
pub fn require_str<'a>(obj: &'a Map<String, Value>, field: &str, origin: &str) -> Result<&'a str> {
    match obj.get(field) {
        None => Err(ConfigError::MissingField {
            field: field.to_string(),
            origin: origin.to_string(),
        }),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ConfigError::InvalidField {
            field: field.to_string(),
            origin: origin.to_string(),
            message: "must be a string".to_string(),
        }),
    }
}

/// Require `field` to be a string with non-whitespace content
pub fn require_non_empty_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    origin: &str,
) -> Result<&'a str> {
    let value = require_str(obj, field, origin)?;
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            field: field.to_string(),
            origin: origin.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

/// Optional string field; present-but-not-a-string is an error, `null` counts as absent
pub fn optional_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    origin: &str,
) -> Result<Option<&'a str>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(ConfigError::InvalidField {
            field: field.to_string(),
            origin: origin.to_string(),
            message: "must be a string".to_string(),
        }),
    }
}
