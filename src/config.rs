//! Configuration for the polling client
//!
//! Loaded from YAML. Every field except `integration` and `auth` has a
//! default, so a minimal file only names what to poll and how to sign in.

use crate::auth::{
    ClientCredentialsProvider, ServiceAccountProvider, StaticTokenProvider, TokenProvider,
    GOOGLE_TOKEN_URL,
};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::integrations::{AnalyticsIntegration, ConfiguredIntegration};
use crate::request::{Integration, DEFAULT_BASE_URL};
use crate::types::{JwtAlgorithm, OutputMode, QueryParameter, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete polling client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Prefix every request URL starts with
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Split tabular responses into one record per row
    #[serde(default = "default_pretty_results")]
    pub pretty_results: bool,

    /// Seconds between re-authentications; 0 disables renewal
    #[serde(default = "default_reauth_interval")]
    pub reauth_interval_seconds: u64,

    /// Seconds between poll cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,

    /// Extra query parameters appended after the integration's own
    #[serde(default)]
    pub additional_params: Vec<QueryParameter>,

    /// What to poll
    pub integration: IntegrationDef,

    /// How to obtain access tokens
    pub auth: AuthDef,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_pretty_results() -> bool {
    true
}

fn default_reauth_interval() -> u64 {
    2400
}

fn default_poll_interval() -> u64 {
    300
}

impl PollerConfig {
    pub fn output_mode(&self) -> OutputMode {
        OutputMode::from_pretty(self.pretty_results)
    }

    pub fn reauth_interval(&self) -> Duration {
        Duration::from_secs(self.reauth_interval_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    /// Check values serde cannot enforce
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::config("base_url cannot be empty"));
        }
        if !self.base_url.ends_with('/') {
            return Err(Error::config(format!(
                "base_url must end with '/': {}",
                self.base_url
            )));
        }
        if self.poll_interval_seconds == 0 {
            return Err(Error::config("poll_interval_seconds must be greater than 0"));
        }
        if let Some(param) = self
            .additional_params
            .iter()
            .find(|p| p.name.trim().is_empty())
        {
            return Err(Error::config(format!(
                "additional parameter with value '{}' has an empty name",
                param.value
            )));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::config("http.timeout_seconds must be greater than 0"));
        }

        self.integration.validate()?;
        self.auth.validate()
    }
}

// ============================================================================
// Integration Definition
// ============================================================================

/// Integration selection from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntegrationDef {
    /// Endpoint, scope and parameters given explicitly
    Custom {
        /// Name used in logs
        #[serde(default = "default_integration_name")]
        name: String,
        /// URL path after the base URL
        url_suffix: String,
        /// Scope requested when authenticating
        scope: String,
        /// Parameters the endpoint requires
        #[serde(default)]
        parameters: Vec<QueryParameter>,
    },

    /// Google Analytics Core Reporting v3
    Analytics {
        /// View (profile) id, with or without the `ga:` prefix
        view_id: String,
        start_date: String,
        end_date: String,
        metrics: Vec<String>,
        #[serde(default)]
        dimensions: Vec<String>,
        #[serde(default)]
        max_results: Option<u32>,
    },
}

fn default_integration_name() -> String {
    "custom".to_string()
}

impl IntegrationDef {
    fn validate(&self) -> Result<()> {
        match self {
            IntegrationDef::Custom {
                url_suffix, scope, ..
            } => {
                if url_suffix.trim().is_empty() {
                    return Err(Error::missing_field("integration.url_suffix"));
                }
                if scope.trim().is_empty() {
                    return Err(Error::missing_field("integration.scope"));
                }
            }
            IntegrationDef::Analytics {
                view_id, metrics, ..
            } => {
                if view_id.trim().is_empty() {
                    return Err(Error::missing_field("integration.view_id"));
                }
                if metrics.is_empty() {
                    return Err(Error::missing_field("integration.metrics"));
                }
            }
        }
        Ok(())
    }

    /// Build the integration this definition describes
    pub fn build(&self) -> Arc<dyn Integration> {
        match self {
            IntegrationDef::Custom {
                name,
                url_suffix,
                scope,
                parameters,
            } => Arc::new(
                ConfiguredIntegration::new(name.as_str())
                    .with_url_suffix(url_suffix.as_str())
                    .with_scope(scope.as_str())
                    .with_parameters(parameters.clone()),
            ),
            IntegrationDef::Analytics {
                view_id,
                start_date,
                end_date,
                metrics,
                dimensions,
                max_results,
            } => {
                let mut integration = AnalyticsIntegration::new(
                    view_id.as_str(),
                    start_date.as_str(),
                    end_date.as_str(),
                    metrics.clone(),
                )
                .with_dimensions(dimensions.clone());
                if let Some(max_results) = max_results {
                    integration = integration.with_max_results(*max_results);
                }
                Arc::new(integration)
            }
        }
    }
}

// ============================================================================
// Auth Definition
// ============================================================================

/// Token provider selection from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthDef {
    /// Pre-issued bearer token
    Static { token: String },

    /// OAuth2 client credentials grant
    ClientCredentials {
        token_url: String,
        client_id: String,
        client_secret: String,
        /// Additional token request body parameters
        #[serde(default)]
        body: StringMap,
    },

    /// Service account JWT bearer exchange
    ServiceAccount {
        client_email: String,
        /// PEM private key, inline
        #[serde(default)]
        private_key: Option<String>,
        /// PEM private key, read from a file
        #[serde(default)]
        private_key_file: Option<String>,
        #[serde(default = "default_token_url")]
        token_url: String,
        /// User to impersonate
        #[serde(default)]
        subject: Option<String>,
        #[serde(default)]
        algorithm: JwtAlgorithm,
    },
}

fn default_token_url() -> String {
    GOOGLE_TOKEN_URL.to_string()
}

impl AuthDef {
    fn validate(&self) -> Result<()> {
        match self {
            AuthDef::Static { token } => {
                if token.is_empty() {
                    return Err(Error::missing_field("auth.token"));
                }
            }
            AuthDef::ClientCredentials {
                token_url,
                client_id,
                ..
            } => {
                if token_url.is_empty() {
                    return Err(Error::missing_field("auth.token_url"));
                }
                if client_id.is_empty() {
                    return Err(Error::missing_field("auth.client_id"));
                }
            }
            AuthDef::ServiceAccount {
                client_email,
                private_key,
                private_key_file,
                ..
            } => {
                if client_email.is_empty() {
                    return Err(Error::missing_field("auth.client_email"));
                }
                if private_key.is_none() && private_key_file.is_none() {
                    return Err(Error::config(
                        "service_account auth needs private_key or private_key_file",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Build the token provider, sharing `http_client` for token requests
    pub fn build(&self, http_client: &reqwest::Client) -> Result<Arc<dyn TokenProvider>> {
        let provider: Arc<dyn TokenProvider> = match self {
            AuthDef::Static { token } => Arc::new(StaticTokenProvider::new(token.as_str())),
            AuthDef::ClientCredentials {
                token_url,
                client_id,
                client_secret,
                body,
            } => {
                let mut provider = ClientCredentialsProvider::new(
                    token_url.as_str(),
                    client_id.as_str(),
                    client_secret.as_str(),
                )
                .with_client(http_client.clone());
                for (key, value) in body {
                    provider = provider.with_body_param(key.as_str(), value.as_str());
                }
                Arc::new(provider)
            }
            AuthDef::ServiceAccount {
                client_email,
                private_key,
                private_key_file,
                token_url,
                subject,
                algorithm,
            } => {
                let key = match (private_key, private_key_file) {
                    (Some(key), _) => key.clone(),
                    (None, Some(path)) => fs::read_to_string(path).map_err(|e| {
                        Error::config(format!("Failed to read private key file '{path}': {e}"))
                    })?,
                    (None, None) => return Err(Error::missing_field("auth.private_key")),
                };

                let mut provider = ServiceAccountProvider::new(client_email.as_str(), key)
                    .with_token_url(token_url.as_str())
                    .with_algorithm(*algorithm)
                    .with_client(http_client.clone());
                if let Some(subject) = subject {
                    provider = provider.with_subject(subject.as_str());
                }
                Arc::new(provider)
            }
        };
        Ok(provider)
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent override
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: None,
        }
    }
}

impl HttpConfig {
    pub fn client_config(&self) -> HttpClientConfig {
        let mut builder =
            HttpClientConfig::builder().timeout(Duration::from_secs(self.timeout_seconds));
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent.as_str());
        }
        builder.build()
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<PollerConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load_config_from_str(&content)
}

/// Load and validate configuration from a YAML string
pub fn load_config_from_str(yaml: &str) -> Result<PollerConfig> {
    let config: PollerConfig = serde_yaml::from_str(yaml)?;
    config.validate()?;
    Ok(config)
}
