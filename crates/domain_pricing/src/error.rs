//! Pricing domain errors
//!
//! Every error here is deterministic and derived from the inputs of a
//! calculation. None of them is worth retrying.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use core_kernel::{Currency, MoneyError, ProductTemplateId, RegionCode};

/// Why a promo code was not applied
///
/// When several conditions fail at once only the highest-precedence reason
/// is reported: `Expired` beats `Exhausted`, which beats `BelowMinimum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoRejection {
    /// No promo code with this value exists
    NotFound,
    /// The current instant is outside the code's validity window
    Expired,
    /// The usage limit has been reached
    Exhausted,
    /// The subtotal is below the code's configured minimum
    BelowMinimum,
}

impl PromoRejection {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            PromoRejection::NotFound => "PROMO_NOT_FOUND",
            PromoRejection::Expired => "PROMO_EXPIRED",
            PromoRejection::Exhausted => "PROMO_EXHAUSTED",
            PromoRejection::BelowMinimum => "PROMO_BELOW_MINIMUM_SUBTOTAL",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            PromoRejection::NotFound => "not found",
            PromoRejection::Expired => "expired",
            PromoRejection::Exhausted => "usage limit reached",
            PromoRejection::BelowMinimum => "below minimum subtotal",
        }
    }
}

impl fmt::Display for PromoRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors that can occur while pricing a configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PricingError {
    /// No active price book exists for the product
    #[error("No active price book for product {product}")]
    PriceBookNotFound {
        product: ProductTemplateId,
    },

    /// No tax rule exists for the region
    #[error("No tax rule for region {region}")]
    TaxRuleNotFound {
        region: RegionCode,
    },

    /// Two amounts in different currencies met in the pipeline
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    /// The promo code was rejected and strict promo handling is enabled
    #[error("Invalid promo code {code}: {reason}")]
    InvalidPromoCode {
        code: String,
        reason: PromoRejection,
    },

    /// Width or height is not strictly positive
    #[error("Invalid dimensions: {width_cm}cm x {height_cm}cm")]
    InvalidDimensions {
        width_cm: String,
        height_cm: String,
    },

    /// Negative quote lifetime
    #[error("Invalid quote TTL: {0} minutes")]
    InvalidTtl(i64),

    /// Reference data violates a basic constraint (negative rate, etc.)
    #[error("Invalid reference data: {0}")]
    InvalidReferenceData(String),
}

impl PricingError {
    pub fn invalid_reference_data(message: impl Into<String>) -> Self {
        PricingError::InvalidReferenceData(message.into())
    }
}

impl From<MoneyError> for PricingError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::CurrencyMismatch { expected, actual } => {
                PricingError::CurrencyMismatch { expected, actual }
            }
            other => PricingError::InvalidReferenceData(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_mismatch_maps_to_pricing_mismatch() {
        let err: PricingError = MoneyError::CurrencyMismatch {
            expected: Currency::RUB,
            actual: Currency::EUR,
        }
        .into();
        assert_eq!(
            err,
            PricingError::CurrencyMismatch {
                expected: Currency::RUB,
                actual: Currency::EUR,
            }
        );
    }

    #[test]
    fn test_money_overflow_is_bad_reference_data() {
        assert_eq!(
            PricingError::from(MoneyError::Overflow),
            PricingError::InvalidReferenceData("Amount out of range".to_string())
        );
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(PromoRejection::BelowMinimum.code(), "PROMO_BELOW_MINIMUM_SUBTOTAL");
        assert_eq!(PromoRejection::BelowMinimum.to_string(), "below minimum subtotal");
    }
}
