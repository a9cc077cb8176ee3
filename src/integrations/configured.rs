//! Integration described entirely by configuration

use crate::error::{Error, Result};
use crate::request::Integration;
use crate::types::{OptionStringExt, ParameterSet, QueryParameter};

/// Integration whose suffix, scope and parameters come from config.
///
/// Blank values are treated as not supplied.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredIntegration {
    name: String,
    url_suffix: Option<String>,
    scope: Option<String>,
    parameters: Vec<QueryParameter>,
}

impl ConfiguredIntegration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_url_suffix(mut self, suffix: impl Into<String>) -> Self {
        let suffix: String = suffix.into();
        self.url_suffix = suffix.none_if_empty();
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope: String = scope.into();
        self.scope = scope.none_if_empty();
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<QueryParameter>) -> Self {
        self.parameters = parameters;
        self
    }
}

impl Integration for ConfiguredIntegration {
    fn name(&self) -> &str {
        &self.name
    }

    fn url_suffix(&self) -> Result<String> {
        self.url_suffix
            .as_deref()
            .map(|s| s.trim_start_matches('/').to_string())
            .ok_or_else(|| Error::unimplemented("url_suffix"))
    }

    fn scope(&self) -> Result<String> {
        self.scope
            .clone()
            .ok_or_else(|| Error::unimplemented("scope"))
    }

    fn url_parameters(&self) -> ParameterSet {
        ParameterSet::from(self.parameters.as_slice())
    }
}
