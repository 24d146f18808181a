//! Customer-entered promo codes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Money, ValidityWindow};
use crate::discount_rule::DiscountRule;
use crate::error::{PricingError, PromoRejection};

/// Canonical form of a promo code as typed by a customer
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// A promo code and its validity rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCode {
    pub code: String,
    pub discount: DiscountRule,
    /// Subtotal required before the code applies
    pub min_subtotal: Option<Money>,
    /// Maximum number of redemptions, None means unlimited
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub usage_count: u32,
    #[serde(default)]
    pub validity: ValidityWindow,
}

impl PromoCode {
    /// Returns the highest-precedence reason the code cannot be used, if any
    ///
    /// Checks run in precedence order (expired, exhausted, below minimum) so
    /// a code failing several conditions reports exactly one reason.
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` when the minimum subtotal is in another currency.
    pub fn rejection(
        &self,
        subtotal: &Money,
        now: DateTime<Utc>,
    ) -> Result<Option<PromoRejection>, PricingError> {
        if !self.validity.contains(now) {
            return Ok(Some(PromoRejection::Expired));
        }

        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                return Ok(Some(PromoRejection::Exhausted));
            }
        }

        if let Some(minimum) = &self.min_subtotal {
            if minimum.is_greater_than(subtotal)? {
                return Ok(Some(PromoRejection::BelowMinimum));
            }
        }

        Ok(None)
    }

    /// Discount granted on `subtotal`, ignoring validity
    pub fn discount_for(&self, subtotal: &Money) -> Result<Money, PricingError> {
        self.discount.amount_for(subtotal)
    }

    /// Normalized code value
    pub fn normalized_code(&self) -> String {
        normalize_code(&self.code)
    }
}
