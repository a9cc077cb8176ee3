//! Authentication module
//!
//! Token lifecycle for long-running clients: acquisition through a
//! [`TokenProvider`], storage in a [`TokenStore`], and periodic renewal
//! driven by the [`Authenticator`].

mod authenticator;
mod provider;
mod types;

pub use authenticator::{Authenticator, DEFAULT_REAUTH_INTERVAL};
pub use provider::{
    bearer_headers, ClientCredentialsProvider, ServiceAccountProvider, StaticTokenProvider,
    TokenProvider, GOOGLE_TOKEN_URL,
};
pub use types::{AccessToken, TokenStore};
