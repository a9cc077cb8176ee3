//! Error types for tabular-poller
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for tabular-poller
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("OAuth2 error: {message}")]
    OAuth2 { message: String },

    #[error("JWT generation failed: {message}")]
    JwtGeneration { message: String },

    // ============================================================================
    // Integration Errors
    // ============================================================================
    #[error("Integration does not implement '{operation}'")]
    Unimplemented { operation: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Sink error: {message}")]
    Sink { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    /// Create an error for an integration hook that was not supplied
    pub fn unimplemented(operation: impl Into<String>) -> Self {
        Self::Unimplemented {
            operation: operation.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Whether this error came from token acquisition or a missing token
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            Error::Credential { .. } | Error::OAuth2 { .. } | Error::JwtGeneration { .. }
        )
    }
}

/// Result type alias for tabular-poller
pub type Result<T> = std::result::Result<T, Error>;
