//! Price books
//!
//! A price book is the versioned price table for one product template: an
//! area rate, floors for small items, and a premium per option.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::{Currency, Money, OptionId, ProductTemplateId};
use crate::error::PricingError;

/// Square centimetres per square metre
const CM2_PER_M2: Decimal = dec!(10000);

/// Publication status of a price book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceBookStatus {
    Draft,
    Active,
}

/// Premium charged for one selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionPremium {
    /// Display name of the option
    pub name: String,
    /// Amount added to the price when the option is selected
    pub amount: Money,
}

/// Versioned price table for a product template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBook {
    pub product_template_id: ProductTemplateId,
    pub currency: Currency,
    /// Price per square metre
    pub base_price_per_area: Money,
    /// Smallest billable area in square metres
    #[serde(default)]
    pub minimum_area: Decimal,
    /// Smallest billable base price
    pub minimum_charge: Option<Money>,
    #[serde(default)]
    pub option_premiums: BTreeMap<OptionId, OptionPremium>,
    pub status: PriceBookStatus,
    pub version: u32,
}

/// How the base price was derived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePrice {
    /// Measured area in square metres
    pub measured_area: Decimal,
    /// Area after applying the minimum-area floor
    pub billable_area: Decimal,
    /// Final base price after the minimum-charge floor
    pub amount: Money,
    /// True when the minimum charge replaced the area price
    pub minimum_charge_applied: bool,
}

impl PriceBook {
    pub fn is_active(&self) -> bool {
        self.status == PriceBookStatus::Active
    }

    /// Premium configured for an option, if any
    pub fn option_premium(&self, option_id: &OptionId) -> Option<&OptionPremium> {
        self.option_premiums.get(option_id)
    }

    /// Resolves the base price for the given outer dimensions
    ///
    /// `area = width * height / 10_000` square metres, floored at
    /// `minimum_area`; the resulting price is floored at `minimum_charge`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` for a non-positive width or height, or one so
    /// large that the area or its price leaves the decimal range, and
    /// `CurrencyMismatch` when the book's own amounts disagree with its currency.
    pub fn base_price(&self, width_cm: Decimal, height_cm: Decimal) -> Result<BasePrice, PricingError> {
        let invalid = || PricingError::InvalidDimensions {
            width_cm: width_cm.to_string(),
            height_cm: height_cm.to_string(),
        };
        if width_cm <= Decimal::ZERO || height_cm <= Decimal::ZERO {
            return Err(invalid());
        }
        self.base_price_per_area.ensure_currency(self.currency)?;

        let measured_area = width_cm
            .checked_mul(height_cm)
            .and_then(|cm2| cm2.checked_div(CM2_PER_M2))
            .ok_or_else(invalid)?;
        let billable_area = measured_area.max(self.minimum_area);
        let area_price = self
            .base_price_per_area
            .multiply(billable_area)
            .map_err(|_| invalid())?;

        let (amount, minimum_charge_applied) = match &self.minimum_charge {
            Some(floor) if floor.is_greater_than(&area_price)? => (*floor, true),
            _ => (area_price, false),
        };

        Ok(BasePrice {
            measured_area,
            billable_area,
            amount,
            minimum_charge_applied,
        })
    }
}
