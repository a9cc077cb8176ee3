//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tabular poller CLI
#[derive(Parser, Debug)]
#[command(name = "tabular-poller")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Authenticate and poll until Ctrl-C, printing records as JSON lines
    Run {
        /// Run a single poll cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Decode a saved response body
    Decode {
        /// File containing the response body
        file: PathBuf,

        /// Emit the whole body as one record
        #[arg(long)]
        raw: bool,

        /// HTTP status the body was received with
        #[arg(long, default_value = "200")]
        status: u16,
    },

    /// Validate configuration
    Validate,

    /// Print the request URL (no authentication performed)
    Url,
}
