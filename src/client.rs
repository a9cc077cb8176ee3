//! Polling client
//!
//! Owns the authenticator, request builder, decoder, executor and sink for
//! one integration, and defines their lifecycle:
//!
//! 1. [`PollingClient::start`] authenticates and arms renewal
//! 2. [`PollingClient::poll_once`] runs one build → GET → decode → emit cycle
//! 3. [`PollingClient::shutdown`] cancels the pending renewal

use crate::auth::{Authenticator, TokenProvider, TokenStore, DEFAULT_REAUTH_INTERVAL};
use crate::config::PollerConfig;
use crate::decode::ResponseDecoder;
use crate::error::Result;
use crate::http::{HttpExecutor, ReqwestExecutor};
use crate::request::{Integration, RequestBuilder, DEFAULT_BASE_URL};
use crate::schedule::{Scheduler, TokioScheduler};
use crate::sink::{JsonLinesSink, RecordSink};
use crate::types::{OutputMode, QueryParameter};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// A long-running client for one integration
pub struct PollingClient {
    integration: Arc<dyn Integration>,
    authenticator: Authenticator,
    requests: RequestBuilder,
    executor: Arc<dyn HttpExecutor>,
    decoder: ResponseDecoder,
    sink: Arc<dyn RecordSink>,
}

impl PollingClient {
    /// Start building a client for `integration` using `provider` for tokens
    pub fn builder(
        integration: Arc<dyn Integration>,
        provider: Arc<dyn TokenProvider>,
    ) -> PollingClientBuilder {
        PollingClientBuilder::new(integration, provider)
    }

    /// Build a client from configuration, emitting to `sink`
    pub fn from_config(config: &PollerConfig, sink: Arc<dyn RecordSink>) -> Result<Self> {
        let http_client = config.http.client_config().build_client()?;
        let provider = config.auth.build(&http_client)?;
        let executor = ReqwestExecutor::with_client(http_client);

        PollingClient::builder(config.integration.build(), provider)
            .base_url(config.base_url.as_str())
            .additional_params(config.additional_params.clone())
            .output_mode(config.output_mode())
            .reauth_interval(config.reauth_interval())
            .executor(Arc::new(executor))
            .sink(sink)
            .build()
    }

    /// Authenticate with the integration's scope.
    ///
    /// Fails only if the integration does not supply a scope. A failed token
    /// acquisition is logged and leaves the client without a token, which
    /// the next poll reports as a credential error. Returns whether a valid
    /// token is now held.
    pub async fn start(&self) -> Result<bool> {
        let scope = self.integration.scope()?;
        info!(integration = self.integration.name(), "authenticating");
        self.authenticator.authenticate(&scope).await;

        let authenticated = self.authenticator.store().is_valid().await;
        if !authenticated {
            warn!(
                integration = self.integration.name(),
                "started without a valid access token"
            );
        }
        Ok(authenticated)
    }

    /// Run one poll cycle and return the number of records emitted
    pub async fn poll_once(&self) -> Result<usize> {
        let request = self.requests.build().await?;
        debug!(url = %request.url, "polling");

        let response = self.executor.get(&request).await?;
        let records = self.decoder.decode(response.status, &response.body)?;
        let count = records.len();

        self.sink.emit(records).await?;
        debug!(
            integration = self.integration.name(),
            records = count,
            "poll cycle complete"
        );
        Ok(count)
    }

    /// Poll every `poll_interval` until `shutdown` resolves, then shut down.
    ///
    /// The first cycle runs immediately. Cycle errors are logged and polling
    /// continues.
    pub async fn run_until<F>(&self, poll_interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once().await {
                        error!(integration = self.integration.name(), error = %e, "poll cycle failed");
                    }
                }
            }
        }

        self.shutdown().await;
    }

    /// Cancel any pending renewal
    pub async fn shutdown(&self) {
        self.authenticator.shutdown().await;
        info!(integration = self.integration.name(), "polling client stopped");
    }

    /// Token state and renewal timer
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.requests
    }

    pub fn integration(&self) -> &Arc<dyn Integration> {
        &self.integration
    }
}

/// Builder for [`PollingClient`]
pub struct PollingClientBuilder {
    integration: Arc<dyn Integration>,
    provider: Arc<dyn TokenProvider>,
    scheduler: Option<Arc<dyn Scheduler>>,
    executor: Option<Arc<dyn HttpExecutor>>,
    sink: Option<Arc<dyn RecordSink>>,
    base_url: String,
    additional_params: Vec<QueryParameter>,
    output_mode: OutputMode,
    reauth_interval: Duration,
}

impl PollingClientBuilder {
    fn new(integration: Arc<dyn Integration>, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            integration,
            provider,
            scheduler: None,
            executor: None,
            sink: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            additional_params: Vec::new(),
            output_mode: OutputMode::default(),
            reauth_interval: DEFAULT_REAUTH_INTERVAL,
        }
    }

    /// Scheduler for renewals (default: tokio timers)
    pub fn scheduler(mut self, scheduler: Arc<dyn Scheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Executor for poll requests (default: reqwest)
    pub fn executor(mut self, executor: Arc<dyn HttpExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Destination for records (default: JSON lines on stdout)
    pub fn sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn additional_params(mut self, params: Vec<QueryParameter>) -> Self {
        self.additional_params = params;
        self
    }

    pub fn output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }

    /// Interval between renewals; zero disables renewal
    pub fn reauth_interval(mut self, interval: Duration) -> Self {
        self.reauth_interval = interval;
        self
    }

    pub fn build(self) -> Result<PollingClient> {
        let executor: Arc<dyn HttpExecutor> = match self.executor {
            Some(executor) => executor,
            None => Arc::new(ReqwestExecutor::new()?),
        };
        let scheduler = self
            .scheduler
            .unwrap_or_else(|| Arc::new(TokioScheduler::new()));
        let sink = self
            .sink
            .unwrap_or_else(|| Arc::new(JsonLinesSink::stdout()));

        let authenticator = Authenticator::new(
            self.provider,
            scheduler,
            TokenStore::new(),
            self.reauth_interval,
        );
        let requests = RequestBuilder::for_authenticator(self.integration.clone(), &authenticator)
            .with_base_url(self.base_url)
            .with_additional_params(self.additional_params);

        Ok(PollingClient {
            integration: self.integration,
            authenticator,
            requests,
            executor,
            decoder: ResponseDecoder::new(self.output_mode),
            sink,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;
    use crate::config::load_config_from_str;
    use crate::error::Error;
    use crate::integrations::ConfiguredIntegration;
    use crate::schedule::ManualScheduler;
    use crate::sink::MemorySink;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

    fn report() -> serde_json::Value {
        json!({
            "columnHeaders": [
                {"name": "ga:userType", "dataType": "STRING"},
                {"name": "ga:hits", "dataType": "INTEGER"}
            ],
            "rows": [["New Visitor", "17"], ["Returning Visitor", "4"]]
        })
    }

    fn integration() -> Arc<dyn Integration> {
        Arc::new(
            ConfiguredIntegration::new("reports")
                .with_url_suffix("analytics/v3/data/ga")
                .with_scope(SCOPE)
                .with_parameters(vec![QueryParameter::new("ids", "ga:1")]),
        )
    }

    fn client(
        server: &MockServer,
        sink: &MemorySink,
        scheduler: &Arc<ManualScheduler>,
    ) -> PollingClient {
        PollingClient::builder(integration(), Arc::new(StaticTokenProvider::new("tok")))
            .base_url(format!("{}/", server.uri()))
            .scheduler(scheduler.clone())
            .sink(Arc::new(sink.clone()))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_poll_once_emits_decoded_rows() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/analytics/v3/data/ga"))
            .and(query_param("ids", "ga:1"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report()))
            .expect(1)
            .mount(&server)
            .await;

        let sink = MemorySink::new();
        let scheduler = Arc::new(ManualScheduler::new());
        let client = client(&server, &sink, &scheduler);

        assert!(client.start().await.unwrap());
        assert_eq!(scheduler.pending(), 1);

        let count = client.poll_once().await.unwrap();
        assert_eq!(count, 2);

        let records = sink.records();
        assert_eq!(records[0]["ga:userType"], json!("New Visitor"));
        assert_eq!(records[0]["ga:hits"], json!(17));
        assert_eq!(records[1]["ga:hits"], json!(4));
    }

    #[tokio::test]
    async fn test_poll_before_start_is_credential_error() {
        let server = MockServer::start().await;
        let sink = MemorySink::new();
        let scheduler = Arc::new(ManualScheduler::new());
        let client = client(&server, &sink, &scheduler);

        let err = client.poll_once().await.unwrap_err();
        assert!(err.is_credential());
        assert_eq!(sink.batches(), 0);
    }

    #[tokio::test]
    async fn test_start_without_scope_fails() {
        let unfinished = Arc::new(ConfiguredIntegration::new("unfinished").with_url_suffix("x"));
        let scheduler = Arc::new(ManualScheduler::new());
        let client = PollingClient::builder(unfinished, Arc::new(StaticTokenProvider::new("tok")))
            .scheduler(scheduler.clone())
            .sink(Arc::new(MemorySink::new()))
            .build()
            .unwrap();

        let err = client.start().await.unwrap_err();
        assert!(matches!(err, Error::Unimplemented { .. }));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test]
    async fn test_malformed_response_emits_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "columnHeaders": [{"name": "a", "dataType": "STRING"}],
                "rows": [["x", "extra"]]
            })))
            .mount(&server)
            .await;

        let sink = MemorySink::new();
        let scheduler = Arc::new(ManualScheduler::new());
        let client = client(&server, &sink, &scheduler);
        client.start().await.unwrap();

        let err = client.poll_once().await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
        assert!(sink.records().is_empty());
    }

    #[tokio::test]
    async fn test_run_until_polls_then_shuts_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(report()))
            .mount(&server)
            .await;

        let sink = MemorySink::new();
        let scheduler = Arc::new(ManualScheduler::new());
        let client = client(&server, &sink, &scheduler);
        client.start().await.unwrap();

        client
            .run_until(
                Duration::from_secs(3600),
                tokio::time::sleep(Duration::from_millis(200)),
            )
            .await;

        assert_eq!(sink.batches(), 1);
        assert!(!client.authenticator().pending_renewal().await);
    }

    #[tokio::test]
    async fn test_from_config() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/drive/v3/files"))
            .and(query_param("pageSize", "10"))
            .and(query_param("fields", "files"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"files": []})))
            .expect(1)
            .mount(&server)
            .await;

        let yaml = format!(
            r#"
base_url: "{}/"
pretty_results: false
additional_params:
  - name: fields
    value: files
integration:
  type: custom
  name: drive
  url_suffix: drive/v3/files
  scope: https://www.googleapis.com/auth/drive.readonly
  parameters:
    - name: pageSize
      value: "10"
auth:
  type: static
  token: abc
"#,
            server.uri()
        );
        let config = load_config_from_str(&yaml).unwrap();
        let sink = MemorySink::new();
        let client = PollingClient::from_config(&config, Arc::new(sink.clone())).unwrap();

        client.start().await.unwrap();
        assert_eq!(client.poll_once().await.unwrap(), 1);
        assert_eq!(sink.records()[0]["files"], json!([]));

        client.shutdown().await;
        assert!(!client.authenticator().pending_renewal().await);
    }
}
