//! Integration contract
//!
//! Each concrete API integration names its endpoint, the scope it needs and
//! the query parameters it always sends.

use crate::error::{Error, Result};
use crate::types::ParameterSet;

/// Per-API behavior plugged into the polling client
pub trait Integration: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str {
        "integration"
    }

    /// URL path appended to the base URL, without a leading slash
    /// (e.g. `analytics/v3/data/ga`)
    fn url_suffix(&self) -> Result<String> {
        Err(Error::unimplemented("url_suffix"))
    }

    /// Scope requested when authenticating
    fn scope(&self) -> Result<String> {
        Err(Error::unimplemented("scope"))
    }

    /// Query parameters the integration requires
    fn url_parameters(&self) -> ParameterSet {
        ParameterSet::new()
    }
}
