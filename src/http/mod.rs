//! HTTP execution module
//!
//! The polling client only consumes the status and body of a GET. The
//! [`HttpExecutor`] trait is that seam; [`ReqwestExecutor`] is the default
//! implementation over a shared reqwest client.

mod client;

pub use client::{
    HttpClientConfig, HttpClientConfigBuilder, HttpExecutor, HttpResponse, ReqwestExecutor,
};
