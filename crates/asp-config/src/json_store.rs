//! JSON persistence utilities

use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// Load and parse a JSON file into an untyped value
///
/// Typed validation happens afterwards so that error messages can name the
/// exact key that is missing.
pub fn load_json_value<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Save value as pretty JSON, creating parent directories
pub fn save_json<T, P>(path: P, value: &T) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    std::fs::write(path, content)?;
    Ok(())
}
