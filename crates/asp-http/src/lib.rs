//! Centralized HTTP client for asp
//!
//! Provides a mockable, configurable HTTP client wrapper used by the topic
//! provisioner to talk to the Kafka REST API.
//!
//! ## Features
//!
//! - **Trait-based design**: Mockable via `HttpClientTrait`
//! - **Configurable**: Timeouts, proxy, user-agent
//! - **Status passthrough**: non-2xx responses are returned, not raised
//! - **Testing support**: Easy mocking with wiremock

pub mod client;
pub mod config;
pub mod error;

pub use client::{shared_client, BasicAuth, HttpClient, HttpClientTrait, HttpResponse};
pub use config::HttpConfig;
pub use error::{HttpError, Result};

/// Re-export commonly used types
pub use reqwest::StatusCode;
