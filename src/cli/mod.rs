//! CLI module
//!
//! Command-line interface for the polling client.
//!
//! # Commands
//!
//! - `run` - Authenticate and poll until interrupted
//! - `decode` - Decode a saved response body
//! - `validate` - Validate a configuration file
//! - `url` - Print the request URL a configuration produces

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;

#[cfg(test)]
mod tests;
