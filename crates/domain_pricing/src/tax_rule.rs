//! Regional tax rules

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Rate, RegionCode};

/// The effective tax rule for a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRule {
    pub region: RegionCode,
    /// Tax rate as a percentage, e.g. 20 for 20%
    pub rate_percent: Decimal,
    pub active: bool,
}

impl TaxRule {
    pub fn new(region: impl Into<RegionCode>, rate_percent: Decimal, active: bool) -> Self {
        Self {
            region: region.into(),
            rate_percent,
            active,
        }
    }

    pub fn rate(&self) -> Rate {
        Rate::from_percentage(self.rate_percent)
    }
}
