//! Tests for CLI argument parsing and commands

use super::*;
use clap::Parser;
use std::io::Write;

#[test]
fn test_parse_run_once_with_global_flags() {
    let cli = Cli::try_parse_from([
        "tabular-poller",
        "run",
        "--config",
        "poller.yaml",
        "--once",
        "-v",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config.unwrap().to_str(), Some("poller.yaml"));
    assert!(matches!(cli.command, Commands::Run { once: true }));
}

#[test]
fn test_parse_decode_defaults() {
    let cli = Cli::try_parse_from(["tabular-poller", "decode", "body.json"]).unwrap();

    match cli.command {
        Commands::Decode { file, raw, status } => {
            assert_eq!(file.to_str(), Some("body.json"));
            assert!(!raw);
            assert_eq!(status, 200);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["tabular-poller", "serve"]).is_err());
}

#[tokio::test]
async fn test_validate_requires_config() {
    let cli = Cli::try_parse_from(["tabular-poller", "validate"]).unwrap();
    let err = Runner::new(cli).run().await.unwrap_err();
    assert!(err.to_string().contains("--config"));
}

#[tokio::test]
async fn test_validate_and_url_with_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r"
integration:
  type: analytics
  view_id: '1'
  start_date: 7daysAgo
  end_date: today
  metrics: [ga:hits]
auth:
  type: static
  token: abc
"
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    for command in ["validate", "url"] {
        let cli = Cli::try_parse_from(["tabular-poller", command, "--config", path]).unwrap();
        Runner::new(cli).run().await.unwrap();
    }
}

#[tokio::test]
async fn test_decode_missing_file() {
    let cli = Cli::try_parse_from(["tabular-poller", "decode", "/nonexistent/body.json"]).unwrap();
    assert!(Runner::new(cli).run().await.is_err());
}
