//! Token types
//!
//! The access token and the store that holds the current one.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

/// An acquired OAuth2 access token
///
/// Tokens are immutable; renewal replaces the whole value in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// The opaque credential
    pub value: String,
    /// The scope requested when acquiring this token
    pub scope: String,
    /// When the token was obtained
    pub acquired_at: DateTime<Utc>,
    /// When the token expires, if the token endpoint reported it
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token with no known expiry
    pub fn new(value: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            scope: scope.into(),
            acquired_at: Utc::now(),
            expires_at: None,
        }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(value: impl Into<String>, scope: impl Into<String>, seconds: i64) -> Self {
        let acquired_at = Utc::now();
        Self {
            value: value.into(),
            scope: scope.into(),
            acquired_at,
            expires_at: Some(acquired_at + chrono::Duration::seconds(seconds)),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}

/// Holds the current access token, if any
///
/// Cloning shares the same slot. Readers observe either the previous or the
/// replacement token, never a mix.
#[derive(Debug, Clone, Default)]
pub struct TokenStore {
    current: Arc<RwLock<Option<AccessToken>>>,
}

impl TokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored token
    pub async fn replace(&self, token: AccessToken) {
        *self.current.write().await = Some(token);
    }

    /// Drop the stored token
    pub async fn clear(&self) {
        *self.current.write().await = None;
    }

    /// Snapshot of the current token
    pub async fn current(&self) -> Option<AccessToken> {
        self.current.read().await.clone()
    }

    /// Whether a token is present and not expired
    pub async fn is_valid(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|t| !t.is_expired())
    }
}
