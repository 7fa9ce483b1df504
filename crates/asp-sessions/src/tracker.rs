//! Session folders and numbered config artifacts
//!
//! Layout under the base directory:
//!
//! ```text
//! <base>/current_session.txt            name of the active session
//! <base>/sessions/<session>/session_info.json
//! <base>/sessions/<session>/001_<prefix>.json
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Per-session metadata file
pub const SESSION_INFO_FILE: &str = "session_info.json";

/// Pointer to the active session, relative to the base directory
pub const CURRENT_SESSION_FILE: &str = "current_session.txt";

const SESSION_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const SESSION_DESCRIPTION: &str = "Atlas Stream Processing session";

/// Metadata of one session as reported by [`SessionTracker::list_sessions`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    #[serde(default = "unknown")]
    pub created_at: String,
    #[serde(default)]
    pub config_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Tracks the active session and writes artifacts into it
#[derive(Debug, Clone)]
pub struct SessionTracker {
    base_dir: PathBuf,
    sessions_dir: PathBuf,
}

impl SessionTracker {
    /// Open the tracker, reusing the pointed-to session or starting a new one
    pub fn open(base_dir: impl Into<PathBuf>) -> SessionResult<Self> {
        let base_dir = base_dir.into();
        let sessions_dir = base_dir.join("sessions");
        fs::create_dir_all(&sessions_dir)?;

        let tracker = Self {
            base_dir,
            sessions_dir,
        };
        let session = tracker.current_session()?;
        debug!(session = %session, "Session tracker opened");
        Ok(tracker)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    fn pointer_file(&self) -> PathBuf {
        self.base_dir.join(CURRENT_SESSION_FILE)
    }

    /// Active session name
    ///
    /// The pointer is re-read on every call; if it is missing or names a
    /// folder that no longer exists a fresh session is created.
    pub fn current_session(&self) -> SessionResult<String> {
        if let Ok(content) = fs::read_to_string(self.pointer_file()) {
            let name = content.trim();
            if !name.is_empty() && self.sessions_dir.join(name).is_dir() {
                return Ok(name.to_string());
            }
            warn!(session = %name, "Session pointer is stale");
        }
        self.create_session()
    }

    /// Folder of the active session
    pub fn session_path(&self) -> SessionResult<PathBuf> {
        Ok(self.sessions_dir.join(self.current_session()?))
    }

    /// Start a new session regardless of the current one
    pub fn force_new_session(&self) -> SessionResult<String> {
        self.create_session()
    }

    fn create_session(&self) -> SessionResult<String> {
        let stamp = Local::now().format(SESSION_NAME_FORMAT).to_string();

        let mut name = stamp.clone();
        let mut suffix = 2;
        while self.sessions_dir.join(&name).exists() {
            name = format!("{}-{}", stamp, suffix);
            suffix += 1;
        }

        let path = self.sessions_dir.join(&name);
        fs::create_dir_all(&path)?;

        let metadata = json!({
            "session_id": name,
            "created_at": Local::now().to_rfc3339(),
            "config_count": 0,
            "description": SESSION_DESCRIPTION,
        });
        fs::write(
            path.join(SESSION_INFO_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;
        fs::write(self.pointer_file(), &name)?;

        info!(session = %name, "Created new session");
        Ok(name)
    }

    /// Write `data` as the next numbered artifact of the active session
    ///
    /// The file is named `NNN_<prefix>.json` where `NNN` is one more than the
    /// number of artifacts already present, or one past the highest number on
    /// disk when earlier artifacts were removed. Existing files are never
    /// overwritten. `created_at`, `session_id` and
    /// `config_type` are added unless `data` already has them.
    pub fn new_config_file(&self, data: &Map<String, Value>, prefix: &str) -> SessionResult<PathBuf> {
        validate_prefix(prefix)?;

        let session = self.current_session()?;
        let session_path = self.sessions_dir.join(&session);

        let mut artifact = Map::new();
        artifact.insert("created_at".into(), json!(Local::now().to_rfc3339()));
        artifact.insert("session_id".into(), json!(session));
        artifact.insert("config_type".into(), json!(prefix));
        for (key, value) in data {
            artifact.insert(key.clone(), value.clone());
        }
        let contents = serde_json::to_string_pretty(&Value::Object(artifact))?;

        // Numbers already on disk are never reused, even after a gap.
        let mut number =
            count_artifacts(&session_path)?.max(highest_artifact_number(&session_path)?) + 1;
        let path = loop {
            let path = session_path.join(format!("{:03}_{}.json", number, prefix));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents.as_bytes())?;
                    break path;
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Artifact already exists, renumbering");
                    number = (highest_artifact_number(&session_path)? + 1).max(number + 1);
                }
                Err(e) => return Err(e.into()),
            }
        };
        self.update_metadata(&session_path)?;

        info!(path = %path.display(), "Created config artifact");
        Ok(path)
    }

    fn update_metadata(&self, session_path: &Path) -> SessionResult<()> {
        let info_path = session_path.join(SESSION_INFO_FILE);

        // Unreadable or corrupt metadata is replaced.
        let mut metadata = fs::read_to_string(&info_path)
            .ok()
            .and_then(|content| serde_json::from_str::<Value>(&content).ok())
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        metadata.insert("config_count".into(), json!(count_artifacts(session_path)?));
        metadata.insert("updated_at".into(), json!(Local::now().to_rfc3339()));

        fs::write(
            info_path,
            serde_json::to_string_pretty(&Value::Object(metadata))?,
        )?;
        Ok(())
    }

    /// Metadata of every session, newest first
    pub fn list_sessions(&self) -> SessionResult<Vec<SessionInfo>> {
        list_sessions(&self.base_dir)
    }
}

/// Metadata of every session under `base_dir`, newest first
///
/// Folders without readable metadata get a synthesized record with
/// `created_at` set to `"unknown"`.
pub fn list_sessions(base_dir: &Path) -> SessionResult<Vec<SessionInfo>> {
    let sessions_dir = base_dir.join("sessions");
    if !sessions_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut sessions = Vec::new();
    for entry in fs::read_dir(&sessions_dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let info = fs::read_to_string(path.join(SESSION_INFO_FILE))
            .ok()
            .and_then(|content| serde_json::from_str::<SessionInfo>(&content).ok());

        match info {
            Some(info) => sessions.push(info),
            None => sessions.push(SessionInfo {
                session_id: name,
                created_at: unknown(),
                config_count: count_artifacts(&path)?,
                description: None,
                updated_at: None,
            }),
        }
    }

    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(sessions)
}

fn count_artifacts(session_path: &Path) -> SessionResult<usize> {
    let mut count = 0;
    for entry in fs::read_dir(session_path)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let is_info = path.file_name().is_some_and(|n| n == SESSION_INFO_FILE);
        if path.is_file() && is_json && !is_info {
            count += 1;
        }
    }
    Ok(count)
}

/// Highest `NNN_` prefix among the session's artifacts, 0 when there are none
fn highest_artifact_number(session_path: &Path) -> SessionResult<usize> {
    let mut highest = 0;
    for entry in fs::read_dir(session_path)? {
        let name = entry?.file_name();
        let number = name
            .to_str()
            .and_then(|name| name.split_once('_'))
            .and_then(|(digits, _)| digits.parse::<usize>().ok());
        if let Some(number) = number {
            highest = highest.max(number);
        }
    }
    Ok(highest)
}

fn validate_prefix(prefix: &str) -> SessionResult<()> {
    let invalid = prefix.trim().is_empty()
        || prefix.contains(['/', '\\'])
        || prefix == "."
        || prefix == "..";
    if invalid {
        return Err(SessionError::InvalidPrefix(prefix.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_session_and_pointer() {
        let dir = tempdir().unwrap();
        let tracker = SessionTracker::open(dir.path()).unwrap();

        let session = tracker.current_session().unwrap();
        let pointer = fs::read_to_string(dir.path().join(CURRENT_SESSION_FILE)).unwrap();
        assert_eq!(pointer, session);
        assert!(tracker.session_path().unwrap().join(SESSION_INFO_FILE).exists());
    }

    #[test]
    fn test_invalid_prefix_rejected() {
        let dir = tempdir().unwrap();
        let tracker = SessionTracker::open(dir.path()).unwrap();

        for prefix in ["", "  ", "../x", "a/b", ".."] {
            assert!(matches!(
                tracker.new_config_file(&Map::new(), prefix),
                Err(SessionError::InvalidPrefix(_))
            ));
        }
    }

    #[test]
    fn test_list_sessions_without_metadata() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sessions").join("manual")).unwrap();
        fs::write(
            dir.path().join("sessions").join("manual").join("001_x.json"),
            "{}",
        )
        .unwrap();

        let sessions = list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, "manual");
        assert_eq!(sessions[0].created_at, "unknown");
        assert_eq!(sessions[0].config_count, 1);
    }
}
