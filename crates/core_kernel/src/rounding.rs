//! Rounding policies for monetary amounts
//!
//! A policy is a decimal scale plus a rounding mode. Policies are plain
//! values; deciding *when* to round belongs to the pricing pipeline.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Currency;

/// How a midpoint or a discarded fraction is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Midpoints round away from zero (commercial rounding)
    #[default]
    HalfUp,
    /// Midpoints round to the nearest even digit (banker's rounding)
    HalfEven,
    /// Truncate toward zero
    Down,
    /// Round away from zero
    Up,
}

impl RoundingMode {
    fn strategy(&self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
        }
    }

    /// Upper-case name used in audit output
    pub fn name(&self) -> &'static str {
        match self {
            RoundingMode::HalfUp => "HALF_UP",
            RoundingMode::HalfEven => "HALF_EVEN",
            RoundingMode::Down => "DOWN",
            RoundingMode::Up => "UP",
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Decimal scale and rounding mode applied to an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoundingPolicy {
    /// Number of decimal places kept
    pub scale: u32,
    /// Rounding mode
    #[serde(default)]
    pub mode: RoundingMode,
}

impl RoundingPolicy {
    /// Two decimal places, half-up
    pub const DEFAULT: RoundingPolicy = RoundingPolicy {
        scale: 2,
        mode: RoundingMode::HalfUp,
    };

    pub fn new(scale: u32, mode: RoundingMode) -> Self {
        Self { scale, mode }
    }

    /// Half-up at the currency's ISO minor units
    pub fn for_currency(currency: Currency) -> Self {
        Self::new(currency.decimal_places(), RoundingMode::HalfUp)
    }

    /// Rounds a decimal according to this policy
    pub fn apply(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.scale, self.mode.strategy())
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for RoundingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} scale={}", self.mode, self.scale)
    }
}
