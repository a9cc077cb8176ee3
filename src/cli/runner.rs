//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::client::PollingClient;
use crate::config::{load_config, PollerConfig};
use crate::decode::ResponseDecoder;
use crate::error::{Error, Result};
use crate::sink::{JsonLinesSink, MemorySink, RecordSink};
use crate::types::OutputMode;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Run { once } => self.poll(*once).await,
            Commands::Decode { file, raw, status } => self.decode(file, *raw, *status).await,
            Commands::Validate => self.validate(),
            Commands::Url => self.url(),
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<PollerConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("Config file not specified (use --config)"))?;
        load_config(path)
    }

    /// Poll until interrupted, or once
    async fn poll(&self, once: bool) -> Result<()> {
        let config = self.load_config()?;
        let client = PollingClient::from_config(&config, Arc::new(JsonLinesSink::stdout()))?;

        client.start().await?;

        if once {
            let result = client.poll_once().await;
            client.shutdown().await;
            let count = result?;
            info!(records = count, "poll complete");
            return Ok(());
        }

        info!(
            interval_seconds = config.poll_interval_seconds,
            "polling until interrupted"
        );
        client
            .run_until(config.poll_interval(), async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            })
            .await;

        Ok(())
    }

    /// Decode a saved response body to JSON lines on stdout
    async fn decode(&self, file: &Path, raw: bool, status: u16) -> Result<()> {
        let body = fs::read_to_string(file).map_err(|e| {
            Error::config(format!(
                "Failed to read response file '{}': {}",
                file.display(),
                e
            ))
        })?;

        let decoder = ResponseDecoder::new(OutputMode::from_pretty(!raw));
        let records = decoder.decode(status, &body)?;
        JsonLinesSink::stdout().emit(records).await
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let config = self.load_config()?;
        let integration = config.integration.build();
        let scope = integration.scope()?;

        println!(
            "Config is valid: integration '{}' with scope {}",
            integration.name(),
            scope
        );
        Ok(())
    }

    /// Print the request URL
    fn url(&self) -> Result<()> {
        let config = self.load_config()?;
        let client = PollingClient::from_config(&config, Arc::new(MemorySink::new()))?;
        println!("{}", client.request_builder().url()?);
        Ok(())
    }
}
