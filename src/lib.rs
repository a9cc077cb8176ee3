// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Tabular Poller
//!
//! A long-running client for OAuth2-protected reporting APIs that answer
//! with tabular JSON.
//!
//! ## Features
//!
//! - **Token Lifecycle**: Acquire a token for the integration's scope and
//!   renew it on a fixed interval, with exactly one renewal pending
//! - **Multiple Token Sources**: Static tokens, client credentials, and
//!   service account JWT exchange
//! - **Request Building**: Base URL + integration suffix + ordered query
//!   parameters, with bearer headers from the current token
//! - **Tabular Decoding**: `columnHeaders` + `rows` become one record per
//!   row, with `INTEGER` columns converted to integers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tabular_poller::config::load_config;
//! use tabular_poller::client::PollingClient;
//! use tabular_poller::sink::JsonLinesSink;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> tabular_poller::Result<()> {
//!     let config = load_config("poller.yaml")?;
//!     let client = PollingClient::from_config(&config, Arc::new(JsonLinesSink::stdout()))?;
//!
//!     client.start().await?;
//!     let count = client.poll_once().await?;
//!     println!("{count} records");
//!
//!     client.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        PollingClient                            │
//! │  start() → authenticate    poll_once() → records    shutdown()  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┼───────────────┬──────────────────┐
//! │     Auth     │    Request    │     HTTP      │      Decode      │
//! ├──────────────┼───────────────┼───────────────┼──────────────────┤
//! │ Authenticator│ Integration   │ HttpExecutor  │ ResponseDecoder  │
//! │ TokenStore   │ RequestBuilder│ reqwest       │ Pretty / Raw     │
//! │ Providers    │ ParameterSet  │               │ RecordSink       │
//! │ Scheduler    │               │               │                  │
//! └──────────────┴───────────────┴───────────────┴──────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Token acquisition, storage and renewal
pub mod auth;

/// One-shot timers for scheduled renewal
pub mod schedule;

/// Integrations and request building
pub mod request;

/// HTTP execution
pub mod http;

/// Response decoding (tabular JSON to records)
pub mod decode;

/// Record sinks
pub mod sink;

/// Built-in integrations
pub mod integrations;

/// YAML configuration
pub mod config;

/// Polling client lifecycle
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::PollingClient;
pub use config::{load_config, load_config_from_str, PollerConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
