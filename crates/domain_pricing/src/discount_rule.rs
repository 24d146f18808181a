//! Discount rules shared by campaigns and promo codes

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use core_kernel::{Money, Rate};
use crate::error::PricingError;

/// How a discount amount is derived from a subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountRule {
    /// A percentage of the subtotal (0 to 100)
    Percentage { percent: Decimal },
    /// A fixed amount, never more than the subtotal
    Fixed { amount: Money },
}

impl DiscountRule {
    pub fn percentage(percent: Decimal) -> Self {
        DiscountRule::Percentage { percent }
    }

    pub fn fixed(amount: Money) -> Self {
        DiscountRule::Fixed { amount }
    }

    /// Discount this rule grants on `subtotal`
    ///
    /// # Errors
    ///
    /// `CurrencyMismatch` when a fixed amount is in another currency,
    /// `InvalidReferenceData` for a negative amount or a percentage outside 0..=100.
    pub fn amount_for(&self, subtotal: &Money) -> Result<Money, PricingError> {
        match self {
            DiscountRule::Percentage { percent } => {
                if *percent < Decimal::ZERO || *percent > dec!(100) {
                    return Err(PricingError::invalid_reference_data(format!(
                        "discount percentage {} outside 0..=100",
                        percent
                    )));
                }
                Ok(Rate::from_percentage(*percent).apply(subtotal)?)
            }
            DiscountRule::Fixed { amount } => {
                subtotal.ensure_same_currency(amount)?;
                if amount.is_negative() {
                    return Err(PricingError::invalid_reference_data(format!(
                        "negative fixed discount {}",
                        amount.to_plain_string()
                    )));
                }
                Ok(amount.min(subtotal)?)
            }
        }
    }
}

impl fmt::Display for DiscountRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountRule::Percentage { percent } => write!(f, "PERCENTAGE {}%", percent.normalize()),
            DiscountRule::Fixed { amount } => write!(f, "FIXED {}", amount.to_plain_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;

    #[test]
    fn test_percentage_amount() {
        let subtotal = Money::new(dec!(1050), Currency::RUB);
        let rule = DiscountRule::percentage(dec!(10));
        assert_eq!(rule.amount_for(&subtotal).unwrap().amount(), dec!(105));
    }

    #[test]
    fn test_fixed_amount_is_clamped_to_subtotal() {
        let subtotal = Money::new(dec!(80), Currency::RUB);
        let rule = DiscountRule::fixed(Money::new(dec!(100), Currency::RUB));
        assert_eq!(rule.amount_for(&subtotal).unwrap().amount(), dec!(80));
    }

    #[test]
    fn test_fixed_amount_in_foreign_currency_fails() {
        let subtotal = Money::new(dec!(80), Currency::RUB);
        let rule = DiscountRule::fixed(Money::new(dec!(10), Currency::EUR));
        assert!(matches!(
            rule.amount_for(&subtotal),
            Err(PricingError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_out_of_range_percentage_fails() {
        let subtotal = Money::new(dec!(80), Currency::RUB);
        assert!(DiscountRule::percentage(dec!(120)).amount_for(&subtotal).is_err());
        assert!(DiscountRule::percentage(dec!(-1)).amount_for(&subtotal).is_err());
    }

    #[test]
    fn test_serde_tagging() {
        let rule: DiscountRule =
            serde_json::from_str(r#"{"type":"PERCENTAGE","percent":"15"}"#).unwrap();
        assert_eq!(rule, DiscountRule::percentage(dec!(15)));
    }
}
