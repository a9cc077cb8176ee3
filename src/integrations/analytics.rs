//! Google Analytics Core Reporting API (v3)
//!
//! Responses carry `columnHeaders` and `rows`, so pretty mode yields one
//! record per dimension combination with integer metrics.

use crate::error::Result;
use crate::request::Integration;
use crate::types::ParameterSet;

/// Path of the Core Reporting data endpoint
pub const ANALYTICS_URL_SUFFIX: &str = "analytics/v3/data/ga";

/// Read-only Analytics scope
pub const ANALYTICS_READONLY_SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Core Reporting query for one view
#[derive(Debug, Clone)]
pub struct AnalyticsIntegration {
    view_id: String,
    start_date: String,
    end_date: String,
    metrics: Vec<String>,
    dimensions: Vec<String>,
    max_results: Option<u32>,
}

impl AnalyticsIntegration {
    /// Query `metrics` for a view (`ga:<id>`) between two dates.
    ///
    /// Dates accept `YYYY-MM-DD` or relative forms such as `7daysAgo`.
    pub fn new(
        view_id: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
        metrics: Vec<String>,
    ) -> Self {
        Self {
            view_id: view_id.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
            metrics,
            dimensions: Vec::new(),
            max_results: None,
        }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Vec<String>) -> Self {
        self.dimensions = dimensions;
        self
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    fn ids(&self) -> String {
        if self.view_id.starts_with("ga:") {
            self.view_id.clone()
        } else {
            format!("ga:{}", self.view_id)
        }
    }
}

impl Integration for AnalyticsIntegration {
    fn name(&self) -> &str {
        "google_analytics"
    }

    fn url_suffix(&self) -> Result<String> {
        Ok(ANALYTICS_URL_SUFFIX.to_string())
    }

    fn scope(&self) -> Result<String> {
        Ok(ANALYTICS_READONLY_SCOPE.to_string())
    }

    fn url_parameters(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        params.insert("ids", self.ids());
        params.insert("start-date", self.start_date.as_str());
        params.insert("end-date", self.end_date.as_str());
        params.insert("metrics", self.metrics.join(","));
        if !self.dimensions.is_empty() {
            params.insert("dimensions", self.dimensions.join(","));
        }
        if let Some(max_results) = self.max_results {
            params.insert("max-results", max_results.to_string());
        }
        params
    }
}
