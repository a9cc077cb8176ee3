//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → token endpoint → data
//! endpoint → decoded records

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tabular_poller::auth::ClientCredentialsProvider;
use tabular_poller::integrations::AnalyticsIntegration;
use tabular_poller::schedule::ManualScheduler;
use tabular_poller::sink::MemorySink;
use tabular_poller::{load_config_from_str, Error, PollingClient};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn report(hits: &str) -> serde_json::Value {
    json!({
        "kind": "analytics#gaData",
        "columnHeaders": [
            {"name": "ga:userType", "columnType": "DIMENSION", "dataType": "STRING"},
            {"name": "ga:hits", "columnType": "METRIC", "dataType": "INTEGER"}
        ],
        "rows": [["New Visitor", hits]]
    })
}

async fn mount_token(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": token,
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .up_to_n_times(1)
        .mount(server)
        .await;
}

async fn mount_report(server: &MockServer, token: &str, hits: &str) {
    Mock::given(method("GET"))
        .and(path("/analytics/v3/data/ga"))
        .and(query_param("ids", "ga:12345"))
        .and(query_param("metrics", "ga:hits"))
        .and(header("Authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(report(hits)))
        .mount(server)
        .await;
}

// ============================================================================
// Config-driven Flow
// ============================================================================

#[tokio::test]
async fn test_config_to_records() {
    let server = MockServer::start().await;
    mount_token(&server, "token-1").await;
    mount_report(&server, "token-1", "1489").await;

    let yaml = format!(
        r#"
base_url: "{uri}/"
integration:
  type: analytics
  view_id: "12345"
  start_date: "2014-10-06"
  end_date: "2014-10-20"
  metrics: ["ga:hits"]
  dimensions: ["ga:userType"]
auth:
  type: client_credentials
  token_url: "{uri}/token"
  client_id: poller
  client_secret: secret
"#,
        uri = server.uri()
    );
    let config = load_config_from_str(&yaml).unwrap();
    let sink = MemorySink::new();
    let client = PollingClient::from_config(&config, Arc::new(sink.clone())).unwrap();

    assert!(client.start().await.unwrap());
    assert!(client.authenticator().pending_renewal().await);

    assert_eq!(client.poll_once().await.unwrap(), 1);
    assert_eq!(
        serde_json::Value::Object(sink.records()[0].clone()),
        json!({"ga:userType": "New Visitor", "ga:hits": 1489})
    );

    client.shutdown().await;
    assert!(!client.authenticator().pending_renewal().await);
}

// ============================================================================
// Renewal
// ============================================================================

#[tokio::test]
async fn test_renewal_switches_token_used_by_polls() {
    let server = MockServer::start().await;
    mount_token(&server, "token-1").await;
    mount_token(&server, "token-2").await;
    mount_report(&server, "token-1", "10").await;
    mount_report(&server, "token-2", "20").await;

    let provider = ClientCredentialsProvider::new(
        format!("{}/token", server.uri()),
        "poller",
        "secret",
    );
    let integration = AnalyticsIntegration::new(
        "12345",
        "7daysAgo",
        "today",
        vec!["ga:hits".to_string()],
    );
    let scheduler = Arc::new(ManualScheduler::new());
    let sink = MemorySink::new();
    let client = PollingClient::builder(Arc::new(integration), Arc::new(provider))
        .base_url(format!("{}/", server.uri()))
        .scheduler(scheduler.clone())
        .sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    client.start().await.unwrap();
    client.poll_once().await.unwrap();

    assert_eq!(scheduler.advance(Duration::from_secs(2400)).await, 1);
    assert_eq!(scheduler.pending(), 1);

    client.poll_once().await.unwrap();

    let hits: Vec<_> = sink.records().iter().map(|r| r["ga:hits"].clone()).collect();
    assert_eq!(hits, vec![json!(10), json!(20)]);
}

#[tokio::test]
async fn test_failed_token_request_surfaces_on_poll() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .mount(&server)
        .await;

    let provider = ClientCredentialsProvider::new(
        format!("{}/token", server.uri()),
        "poller",
        "wrong",
    );
    let integration =
        AnalyticsIntegration::new("1", "7daysAgo", "today", vec!["ga:hits".to_string()]);
    let scheduler = Arc::new(ManualScheduler::new());
    let client = PollingClient::builder(Arc::new(integration), Arc::new(provider))
        .base_url(format!("{}/", server.uri()))
        .scheduler(scheduler.clone())
        .sink(Arc::new(MemorySink::new()))
        .build()
        .unwrap();

    assert!(!client.start().await.unwrap());
    assert!(!client.authenticator().store().is_valid().await);
    assert_eq!(scheduler.pending(), 0);

    let err = client.poll_once().await.unwrap_err();
    assert!(matches!(err, Error::Credential { .. }));
}

// ============================================================================
// Non-200 Responses
// ============================================================================

#[tokio::test]
async fn test_error_status_body_is_still_decoded() {
    let server = MockServer::start().await;
    mount_token(&server, "token-1").await;
    Mock::given(method("GET"))
        .and(path("/analytics/v3/data/ga"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"code": 403, "message": "User does not have sufficient permissions"}
        })))
        .mount(&server)
        .await;

    let provider = ClientCredentialsProvider::new(
        format!("{}/token", server.uri()),
        "poller",
        "secret",
    );
    let integration =
        AnalyticsIntegration::new("1", "7daysAgo", "today", vec!["ga:hits".to_string()]);
    let sink = MemorySink::new();
    let client = PollingClient::builder(Arc::new(integration), Arc::new(provider))
        .base_url(format!("{}/", server.uri()))
        .scheduler(Arc::new(ManualScheduler::new()))
        .sink(Arc::new(sink.clone()))
        .build()
        .unwrap();

    client.start().await.unwrap();
    assert_eq!(client.poll_once().await.unwrap(), 0);
    assert_eq!(sink.batches(), 1);
}
