//! Built-in integrations
//!
//! - [`ConfiguredIntegration`]: endpoint, scope and parameters from config
//! - [`AnalyticsIntegration`]: Google Analytics Core Reporting API v3

mod analytics;
mod configured;

pub use analytics::{AnalyticsIntegration, ANALYTICS_READONLY_SCOPE, ANALYTICS_URL_SUFFIX};
pub use configured::ConfiguredIntegration;
