//! REST client settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default whole-request budget for provisioning calls
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for [`HttpClient`](crate::HttpClient)
///
/// The connect timeout never exceeds the request timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request budget, connect included
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Proxy for every scheme, e.g. `http://proxy.internal:3128`
    pub proxy: Option<String>,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_REQUEST_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            proxy: None,
            user_agent: format!("asp/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout, shrinking the connect timeout to fit
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = self.connect_timeout.min(timeout);
        self
    }

    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Apply an optional proxy; empty strings are ignored
    pub fn with_optional_proxy(self, proxy: Option<&str>) -> Self {
        match proxy.map(str::trim).filter(|p| !p.is_empty()) {
            Some(proxy) => self.with_proxy(proxy),
            None => self,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
