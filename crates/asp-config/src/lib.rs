//! # asp-config
//!
//! Configuration for streaming plumbing provisioning.
//!
//! - [`MainConfig`]: process-wide settings shared by every connector in a batch
//! - [`ConnectorConfig`]: one per-connector file, validated for its [`Direction`]
//! - [`Settings`]: tool binaries, timeouts and the sessions directory, loaded
//!   from an optional file and `ASP_*` environment variables
//!
//! Domain files are validated from raw JSON so that an error always names the
//! offending key.

pub mod connector;
pub mod error;
pub mod json_store;
pub mod main_config;
pub mod settings;
pub mod validation;

pub use connector::{
    ConnectorConfig, DatabaseCredentials, Direction, OffsetReset, QueueCredentials,
    SinkConnectorConfig, SourceConnectorConfig, Topics,
};
pub use error::{ConfigError, Result};
pub use json_store::{load_json_value, save_json};
pub use main_config::{validate_main_config, MainConfig};
pub use settings::{Settings, SettingsLoader};
