//! Kafka topics through the Confluent REST API

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, warn};

use asp_config::QueueCredentials;
use asp_http::{BasicAuth, HttpClientTrait, StatusCode};

use crate::{
    outcome::{ProvisionFailure, ProvisionResult},
    provisioner::TopicProvisioner,
};

/// Partition count for every topic created here
pub const TOPIC_PARTITIONS: u32 = 3;

/// Vendor error code for "topic already exists" on non-409 responses
pub const TOPIC_EXISTS_ERROR_CODE: i64 = 40002;

pub fn topics_url(rest_endpoint: &str, cluster_id: &str) -> String {
    format!(
        "{}/kafka/v3/clusters/{}/topics",
        rest_endpoint.trim_end_matches('/'),
        cluster_id
    )
}

pub fn topic_request_body(topic_name: &str) -> Value {
    json!({
        "topic_name": topic_name,
        "partitions_count": TOPIC_PARTITIONS,
        "configs": [
            {"name": "cleanup.policy", "value": "delete"}
        ]
    })
}

/// Creates topics with an authenticated POST
#[derive(Clone)]
pub struct ConfluentTopicProvisioner {
    client: Arc<dyn HttpClientTrait>,
}

impl ConfluentTopicProvisioner {
    /// The client's configured timeout bounds each request
    pub fn new(client: Arc<dyn HttpClientTrait>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TopicProvisioner for ConfluentTopicProvisioner {
    async fn provision_topic(
        &self,
        rest_endpoint: &str,
        cluster_id: &str,
        credentials: &QueueCredentials,
        topic_name: &str,
    ) -> ProvisionResult {
        let url = topics_url(rest_endpoint, cluster_id);
        let auth = BasicAuth::new(&credentials.api_key, &credentials.api_secret);

        let response = match self
            .client
            .post_json(&url, Some(&auth), &topic_request_body(topic_name))
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(topic = %topic_name, error = %e, "Network error creating topic");
                return ProvisionResult::failed(topic_name, e);
            }
        };

        match response.status {
            StatusCode::CREATED => {
                info!(topic = %topic_name, "Topic created");
                ProvisionResult::created(topic_name)
            }
            StatusCode::CONFLICT => {
                info!(topic = %topic_name, "Topic already exists");
                ProvisionResult::reused(topic_name)
            }
            status => {
                let error_code = response
                    .json()
                    .and_then(|body| body.get("error_code").and_then(Value::as_i64));
                if error_code == Some(TOPIC_EXISTS_ERROR_CODE) {
                    info!(topic = %topic_name, "Topic is already created");
                    return ProvisionResult::reused(topic_name);
                }

                warn!(topic = %topic_name, status = status.as_u16(), "Topic creation failed");
                ProvisionResult::failed(
                    topic_name,
                    ProvisionFailure::Http {
                        status: status.as_u16(),
                        body: response.body,
                    },
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_url() {
        assert_eq!(
            topics_url("https://pkc-1.cloud:443", "lkc-1"),
            "https://pkc-1.cloud:443/kafka/v3/clusters/lkc-1/topics"
        );
        assert_eq!(
            topics_url("https://pkc-1.cloud:443/", "lkc-1"),
            "https://pkc-1.cloud:443/kafka/v3/clusters/lkc-1/topics"
        );
    }

    #[test]
    fn test_request_body() {
        let body = topic_request_body("cdc.shop.orders");
        assert_eq!(body["topic_name"], "cdc.shop.orders");
        assert_eq!(body["partitions_count"], 3);
        assert_eq!(body["configs"][0]["name"], "cleanup.policy");
        assert_eq!(body["configs"][0]["value"], "delete");
    }
}
