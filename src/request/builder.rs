//! Request builder
//!
//! Produces the URL and headers for one poll cycle.

use super::integration::Integration;
use crate::auth::{Authenticator, TokenProvider, TokenStore};
use crate::error::Result;
use crate::types::{ParameterSet, QueryParameter, StringMap};
use std::sync::Arc;
use url::Url;

/// Prefix shared by Google REST APIs
pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/";

/// A fully composed GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRequest {
    /// Absolute URL including the query string
    pub url: String,
    /// Request headers
    pub headers: StringMap,
}

/// Builds poll requests from an integration and the live token
pub struct RequestBuilder {
    base_url: String,
    integration: Arc<dyn Integration>,
    additional_params: Vec<QueryParameter>,
    store: TokenStore,
    provider: Arc<dyn TokenProvider>,
}

impl RequestBuilder {
    /// Create a builder reading tokens from `store` and headers from `provider`
    pub fn new(
        integration: Arc<dyn Integration>,
        store: TokenStore,
        provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            integration,
            additional_params: Vec::new(),
            store,
            provider,
        }
    }

    /// Create a builder sharing the authenticator's store and provider
    pub fn for_authenticator(integration: Arc<dyn Integration>, auth: &Authenticator) -> Self {
        Self::new(integration, auth.store().clone(), auth.provider().clone())
    }

    /// Override the base URL prefix
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Configured parameters sent in addition to the integration's own
    #[must_use]
    pub fn with_additional_params(mut self, params: Vec<QueryParameter>) -> Self {
        self.additional_params = params;
        self
    }

    pub fn integration(&self) -> &Arc<dyn Integration> {
        &self.integration
    }

    /// Integration parameters followed by the configured additional ones
    pub fn parameters(&self) -> ParameterSet {
        let mut params = self.integration.url_parameters();
        params.extend(
            self.additional_params
                .iter()
                .map(|p| (p.name.as_str(), p.value.as_str())),
        );
        params
    }

    /// Compose the request URL. Needs no token.
    pub fn url(&self) -> Result<String> {
        let suffix = self.integration.url_suffix()?;
        let params = self.parameters();

        let mut url = format!("{}{}", self.base_url, suffix);
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query_string());
        }

        Url::parse(&url)?;
        Ok(url)
    }

    /// Compose URL and headers from the token current at call time
    pub async fn build(&self) -> Result<PreparedRequest> {
        let url = self.url()?;

        let mut headers = StringMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        let token = self.store.current().await;
        headers.extend(self.provider.access_token_headers(token.as_ref())?);

        Ok(PreparedRequest { url, headers })
    }
}
