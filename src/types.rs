//! Common types used throughout tabular-poller
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// One decoded output record: field name to typed value
pub type Record = JsonObject;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Query Parameters
// ============================================================================

/// A configured name/value pair appended to the request query string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParameter {
    /// Parameter name
    #[serde(alias = "prop_name")]
    pub name: String,
    /// Parameter value
    #[serde(alias = "prop_value")]
    pub value: String,
}

impl QueryParameter {
    /// Create a new query parameter
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Ordered parameter set where a later name replaces the earlier value in place
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    pairs: Vec<(String, String)>,
}

impl ParameterSet {
    /// Create an empty parameter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter, replacing the value of an existing name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(n, _)| *n == name) {
            Some(existing) => existing.1 = value,
            None => self.pairs.push((name, value)),
        }
    }

    /// Insert every pair from an iterator
    pub fn extend<I, K, V>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }

    /// Look up a parameter value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode as `application/x-www-form-urlencoded`
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl From<&[QueryParameter]> for ParameterSet {
    fn from(params: &[QueryParameter]) -> Self {
        let mut set = Self::new();
        set.extend(params.iter().map(|p| (p.name.as_str(), p.value.as_str())));
        set
    }
}

// ============================================================================
// Output Mode
// ============================================================================

/// How decoded responses are turned into records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// One typed record per tabular row
    #[default]
    Pretty,
    /// The whole parsed body as a single record
    Raw,
}

impl OutputMode {
    /// Map the `pretty_results` toggle onto a mode
    pub fn from_pretty(pretty: bool) -> Self {
        if pretty {
            Self::Pretty
        } else {
            Self::Raw
        }
    }
}

// ============================================================================
// JWT Algorithm
// ============================================================================

/// JWT signing algorithm for service-account assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    /// RSA using SHA-256
    #[default]
    RS256,
    /// RSA using SHA-384
    RS384,
    /// RSA using SHA-512
    RS512,
}

impl From<JwtAlgorithm> for jsonwebtoken::Algorithm {
    fn from(alg: JwtAlgorithm) -> Self {
        match alg {
            JwtAlgorithm::RS256 => jsonwebtoken::Algorithm::RS256,
            JwtAlgorithm::RS384 => jsonwebtoken::Algorithm::RS384,
            JwtAlgorithm::RS512 => jsonwebtoken::Algorithm::RS512,
        }
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
