//! Token acquisition capability
//!
//! A [`TokenProvider`] obtains access tokens for a scope and turns a token
//! into request headers. The authenticator only talks to this trait; the
//! providers here are single-grant exchanges, not a general OAuth2 client.

use super::types::AccessToken;
use crate::error::{Error, Result};
use crate::types::{JwtAlgorithm, StringMap};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default Google OAuth2 token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Source of access tokens
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Acquire a fresh access token for `scope`
    async fn get_access_token(&self, scope: &str) -> Result<AccessToken>;

    /// Headers that authorize a request with `token`.
    ///
    /// With no token this signals a credential error.
    fn access_token_headers(&self, token: Option<&AccessToken>) -> Result<StringMap> {
        bearer_headers(token)
    }
}

/// `Authorization: Bearer <token>` header map
pub fn bearer_headers(token: Option<&AccessToken>) -> Result<StringMap> {
    let token = token.ok_or_else(|| Error::credential("no access token available"))?;
    let mut headers = StringMap::new();
    headers.insert(
        "Authorization".to_string(),
        format!("Bearer {}", token.value),
    );
    Ok(headers)
}

// ============================================================================
// Static Token
// ============================================================================

/// Provider that hands out a pre-issued token
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_access_token(&self, scope: &str) -> Result<AccessToken> {
        if self.token.is_empty() {
            return Err(Error::credential("static token is empty"));
        }
        Ok(AccessToken::new(self.token.clone(), scope))
    }
}

// ============================================================================
// Client Credentials
// ============================================================================

/// Provider using the OAuth2 client credentials grant
#[derive(Debug, Clone)]
pub struct ClientCredentialsProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    extra_body: Vec<(String, String)>,
    http_client: Client,
}

impl ClientCredentialsProvider {
    /// Create a provider for the given token endpoint and client
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            extra_body: Vec::new(),
            http_client: Client::new(),
        }
    }

    /// Add a parameter to the token request body
    #[must_use]
    pub fn with_body_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_body.push((key.into(), value.into()));
        self
    }

    /// Use a custom HTTP client for token requests
    #[must_use]
    pub fn with_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn get_access_token(&self, scope: &str) -> Result<AccessToken> {
        let mut form = vec![
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

        if !scope.is_empty() {
            form.push(("scope", scope));
        }

        for (key, value) in &self.extra_body {
            form.push((key.as_str(), value.as_str()));
        }

        debug!(token_url = %self.token_url, "requesting client credentials token");
        request_token(&self.http_client, &self.token_url, &form, scope).await
    }
}

// ============================================================================
// Service Account (JWT bearer)
// ============================================================================

/// Provider that signs a JWT assertion and exchanges it for an access token
///
/// This is the Google service-account flow: the assertion carries the
/// requested scope and is posted to the token endpoint.
#[derive(Debug, Clone)]
pub struct ServiceAccountProvider {
    client_email: String,
    private_key: String,
    token_url: String,
    subject: Option<String>,
    algorithm: JwtAlgorithm,
    token_lifetime_seconds: u64,
    http_client: Client,
}

impl ServiceAccountProvider {
    /// Create a provider for a service account and its PEM private key
    pub fn new(client_email: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            client_email: client_email.into(),
            private_key: private_key.into(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            subject: None,
            algorithm: JwtAlgorithm::default(),
            token_lifetime_seconds: 3600,
            http_client: Client::new(),
        }
    }

    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Impersonate a user (domain-wide delegation)
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: JwtAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_token_lifetime(mut self, seconds: u64) -> Self {
        self.token_lifetime_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Build and sign the assertion for `scope`
    fn assertion(&self, scope: &str) -> Result<String> {
        let now = Utc::now().timestamp();
        #[allow(clippy::cast_possible_wrap)]
        let exp = now + self.token_lifetime_seconds as i64;

        let claims = AssertionClaims {
            iss: &self.client_email,
            sub: self.subject.as_deref(),
            scope,
            aud: &self.token_url,
            iat: now,
            exp,
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.private_key.as_bytes()).map_err(|e| {
            Error::JwtGeneration {
                message: format!("Invalid private key: {e}"),
            }
        })?;

        encode(&Header::new(self.algorithm.into()), &claims, &encoding_key).map_err(|e| {
            Error::JwtGeneration {
                message: format!("Failed to encode JWT: {e}"),
            }
        })
    }
}

#[async_trait]
impl TokenProvider for ServiceAccountProvider {
    async fn get_access_token(&self, scope: &str) -> Result<AccessToken> {
        let assertion = self.assertion(scope)?;
        let form = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        debug!(
            client_email = %self.client_email,
            token_url = %self.token_url,
            "exchanging service account assertion"
        );
        request_token(&self.http_client, &self.token_url, &form, scope).await
    }
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<&'a str>,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

// ============================================================================
// Token endpoint
// ============================================================================

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_access_token(self, scope: &str) -> AccessToken {
        match self.expires_in {
            Some(secs) => AccessToken::expires_in(self.access_token, scope, secs),
            None => AccessToken::new(self.access_token, scope),
        }
    }
}

async fn request_token(
    http_client: &Client,
    token_url: &str,
    form: &[(&str, &str)],
    scope: &str,
) -> Result<AccessToken> {
    let response = http_client
        .post(token_url)
        .form(form)
        .send()
        .await
        .map_err(|e| Error::OAuth2 {
            message: format!("Token request failed: {e}"),
        })?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::OAuth2 {
            message: format!("Token request failed with status {status}: {body}"),
        });
    }

    let token_response: TokenResponse = response.json().await.map_err(|e| Error::OAuth2 {
        message: format!("Invalid token response: {e}"),
    })?;
    Ok(token_response.into_access_token(scope))
}
