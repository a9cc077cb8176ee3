//! HTTP executor
//!
//! Performs the GET for a [`PreparedRequest`] and hands back status and body.

use crate::error::{Error, Result};
use crate::request::PreparedRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Status code and body of an executed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Capability to execute a prepared GET request
#[async_trait]
pub trait HttpExecutor: Send + Sync {
    /// Execute the request. Non-2xx statuses are returned, not raised.
    async fn get(&self, request: &PreparedRequest) -> Result<HttpResponse>;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("tabular-poller/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Build a reqwest client with these settings
    pub fn build_client(&self) -> Result<Client> {
        Ok(Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// [`HttpExecutor`] backed by reqwest
#[derive(Debug, Clone)]
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    /// Create an executor with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpClientConfig::default())
    }

    /// Create an executor with custom configuration
    pub fn with_config(config: &HttpClientConfig) -> Result<Self> {
        Ok(Self::with_client(config.build_client()?))
    }

    /// Wrap an existing reqwest client, e.g. one shared with token providers
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpExecutor for ReqwestExecutor {
    async fn get(&self, request: &PreparedRequest) -> Result<HttpResponse> {
        let mut req = self.client.get(&request.url);
        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Error::Http)?;

        debug!(status, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}
