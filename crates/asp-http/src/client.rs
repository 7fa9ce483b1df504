//! HTTP client implementation

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use crate::{
    config::HttpConfig,
    error::{HttpError, Result},
};

/// Basic-auth credentials
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"****")
            .finish()
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: String,
}

impl HttpResponse {
    /// Parse the body as JSON, `None` if it is not valid JSON
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Mockable HTTP client trait
#[async_trait]
pub trait HttpClientTrait: Send + Sync {
    /// Execute a POST request with a JSON body
    async fn post_json(
        &self,
        url: &str,
        auth: Option<&BasicAuth>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse>;
}

/// Production HTTP client
pub struct HttpClient {
    inner: reqwest::Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with configuration
    pub fn new(config: HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| HttpError::InvalidProxy(e.to_string()))?;
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| HttpError::BuildError(e.to_string()))?;

        Ok(Self { inner, config })
    }

    /// Create HTTP client with default configuration
    pub fn with_defaults() -> Result<Self> {
        Self::new(HttpConfig::default())
    }

    /// Get configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    async fn send_json(
        &self,
        url: &str,
        auth: Option<&BasicAuth>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let url = url
            .parse::<url::Url>()
            .map_err(|e| HttpError::InvalidUrl(e.to_string()))?;

        let mut request = self.inner.post(url).json(body);
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpError::Timeout(self.config.timeout)
            } else {
                HttpError::RequestFailed(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        debug!(status = %status, "HTTP response received");

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        auth: Option<&BasicAuth>,
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        debug!("HTTP POST: {}", url);
        self.send_json(url, auth, body).await
    }
}

/// Create a shared HTTP client (Arc-wrapped for cloning)
pub fn shared_client(config: HttpConfig) -> Result<Arc<dyn HttpClientTrait>> {
    Ok(Arc::new(HttpClient::new(config)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation_with_defaults() {
        assert!(HttpClient::with_defaults().is_ok());
    }

    #[test]
    fn test_client_creation_with_config() {
        let config = HttpConfig::default().with_timeout(Duration::from_secs(10));
        let client = HttpClient::new(config).unwrap();
        assert_eq!(client.config().timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_proxy() {
        let config = HttpConfig::default().with_proxy("invalid-proxy");
        let result = HttpClient::new(config);
        assert!(matches!(result, Err(HttpError::InvalidProxy(_))));
    }

    #[tokio::test]
    async fn test_post_invalid_url() {
        let client = HttpClient::with_defaults().unwrap();
        let result = client
            .post_json("not a url", None, &serde_json::json!({}))
            .await;
        assert!(matches!(result, Err(HttpError::InvalidUrl(_))));
    }

    #[test]
    fn test_basic_auth_debug_hides_password() {
        let auth = BasicAuth::new("key", "secret");
        let rendered = format!("{:?}", auth);
        assert!(rendered.contains("key"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse {
            status: StatusCode::BAD_REQUEST,
            body: r#"{"error_code": 40002}"#.to_string(),
        };
        assert_eq!(response.json().unwrap()["error_code"], 40002);

        let response = HttpResponse {
            status: StatusCode::BAD_GATEWAY,
            body: "<html>".to_string(),
        };
        assert!(response.json().is_none());
    }
}
