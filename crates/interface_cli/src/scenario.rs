//! JSON scenarios
//!
//! A scenario bundles the reference data the engine should see with an
//! optional request to price. `now` pins the clock so a scenario prices the
//! same way on every run.
//!
//! ```json
//! {
//!   "now": "2024-06-01T12:00:00Z",
//!   "reference_data": { "price_books": [], "campaigns": [], "promo_codes": [], "tax_rules": [] },
//!   "request": {
//!     "product_template_id": "WINDOW-PVC-2",
//!     "width_cm": "100",
//!     "height_cm": "100",
//!     "selected_option_ids": ["SILL"],
//!     "currency": "RUB",
//!     "promo_code": "BIG1000",
//!     "region": "RU-MOW"
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use app_quote::QuoteRequest;
use core_kernel::{Clock, FixedClock, SystemClock};
use domain_pricing::adapters::ReferenceDataSet;

use crate::error::CliError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reference_data: ReferenceDataSet,
    #[serde(default)]
    pub request: Option<QuoteRequest>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, CliError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let json = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Fixed clock at `now`, or the system clock when unset
    pub fn clock(&self) -> Arc<dyn Clock> {
        match self.now {
            Some(now) => Arc::new(FixedClock::new(now)),
            None => Arc::new(SystemClock),
        }
    }

    pub fn request(&self) -> Result<&QuoteRequest, CliError> {
        self.request
            .as_ref()
            .ok_or_else(|| CliError::Scenario("scenario has no request to price".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_scenario() {
        let scenario = Scenario::from_json("{}").unwrap();
        assert!(scenario.now.is_none());
        assert!(scenario.reference_data.price_books.is_empty());
        assert!(matches!(scenario.request(), Err(CliError::Scenario(_))));
    }

    #[test]
    fn test_malformed_json_is_a_scenario_error() {
        assert!(matches!(
            Scenario::from_json("{\"request\": 5}"),
            Err(CliError::Scenario(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }
}
