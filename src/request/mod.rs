//! Request building module
//!
//! Composes the polling request from a base URL, an [`Integration`] and the
//! current access token. Rebuilt before every poll cycle because renewal
//! replaces the token in the background.

mod builder;
mod integration;

pub use builder::{PreparedRequest, RequestBuilder, DEFAULT_BASE_URL};
pub use integration::Integration;
