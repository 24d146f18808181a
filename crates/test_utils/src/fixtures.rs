//! Pre-built Test Fixtures
//!
//! Ready-to-use reference data for the standard pricing scenarios. The
//! canonical one is a 1 m² PVC window at 1000 RUB with a 50 RUB sill, a
//! 100 RUB campaign, a 1000 RUB promo code and 20% Moscow tax, which prices
//! to 882.00 RUB once the 30% discount cap kicks in.

use chrono::{DateTime, Duration, TimeZone, Utc};
use core_kernel::{CampaignId, Currency, Money, ProductTemplateId, RegionCode, ValidityWindow};
use domain_pricing::adapters::ReferenceDataSet;
use domain_pricing::{Campaign, DiscountRule, PriceBook, PromoCode, TaxRule};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::builders::{CampaignBuilder, PriceBookBuilder, PromoCodeBuilder};

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Creates a RUB amount
    pub fn rub(amount: Decimal) -> Money {
        Money::new(amount, Currency::RUB)
    }

    /// Standard area rate for the canonical window
    pub fn rub_1000() -> Money {
        Self::rub(dec!(1000))
    }

    /// Premium for the window sill option
    pub fn rub_50() -> Money {
        Self::rub(dec!(50))
    }

    /// Creates a EUR amount for currency mismatch tests
    pub fn eur_100() -> Money {
        Money::new(dec!(100.00), Currency::EUR)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The instant every fixture calculation runs at
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Window covering the whole of June 2024
    pub fn june() -> ValidityWindow {
        ValidityWindow::bounded(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap(),
        )
        .unwrap()
    }

    /// Window that closed before `now`
    pub fn last_year() -> ValidityWindow {
        ValidityWindow::bounded(
            Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap(),
        )
        .unwrap()
    }

    /// `now` shifted by a number of minutes
    pub fn now_plus_minutes(minutes: i64) -> DateTime<Utc> {
        Self::now() + Duration::minutes(minutes)
    }
}

/// Fixture for string test data
pub struct StringFixtures;

impl StringFixtures {
    pub fn window_product() -> &'static str {
        "WINDOW-PVC-2"
    }

    pub fn door_product() -> &'static str {
        "DOOR-OAK-1"
    }

    pub fn sill_option() -> &'static str {
        "SILL"
    }

    pub fn moscow_region() -> &'static str {
        "RU-MOW"
    }

    pub fn untaxed_region() -> &'static str {
        "RU-NONE"
    }

    pub fn big_promo() -> &'static str {
        "BIG1000"
    }

    pub fn minimum_promo() -> &'static str {
        "MIN5000"
    }
}

/// Fixture for identifier test data
pub struct IdFixtures;

impl IdFixtures {
    pub fn window_product() -> ProductTemplateId {
        ProductTemplateId::new(StringFixtures::window_product())
    }

    pub fn door_product() -> ProductTemplateId {
        ProductTemplateId::new(StringFixtures::door_product())
    }

    pub fn moscow() -> RegionCode {
        RegionCode::new(StringFixtures::moscow_region())
    }

    /// A campaign id with a fixed value
    pub fn campaign_id() -> CampaignId {
        CampaignId::from_uuid(Uuid::from_u128(0x0190_0000_0000_7000_8000_0000_0000_0001))
    }
}

/// Fixture for pricing reference data
pub struct PricingFixtures;

impl PricingFixtures {
    /// 1000 RUB per m² with a 50 RUB sill, version 1
    pub fn window_price_book() -> PriceBook {
        PriceBookBuilder::new().build()
    }

    /// Fixed 100 RUB campaign on the window product
    pub fn campaign_100() -> Campaign {
        CampaignBuilder::new()
            .with_id(IdFixtures::campaign_id())
            .with_rule(DiscountRule::fixed(MoneyFixtures::rub(dec!(100))))
            .build()
    }

    /// Fixed 1000 RUB promo code with no restrictions
    pub fn promo_1000() -> PromoCode {
        PromoCodeBuilder::new(StringFixtures::big_promo())
            .with_rule(DiscountRule::fixed(MoneyFixtures::rub(dec!(1000))))
            .build()
    }

    /// 10% promo code requiring a 5000 RUB subtotal
    pub fn promo_min_5000() -> PromoCode {
        PromoCodeBuilder::new(StringFixtures::minimum_promo())
            .with_rule(DiscountRule::percentage(dec!(10)))
            .with_min_subtotal(MoneyFixtures::rub(dec!(5000)))
            .build()
    }

    /// 20% active Moscow tax
    pub fn moscow_tax() -> TaxRule {
        TaxRule::new(StringFixtures::moscow_region(), dec!(20), true)
    }

    /// A tax rule that exists but is switched off
    pub fn inactive_tax() -> TaxRule {
        TaxRule::new(StringFixtures::untaxed_region(), dec!(20), false)
    }

    /// Every fixture above in one data set
    pub fn reference_data() -> ReferenceDataSet {
        ReferenceDataSet {
            price_books: vec![Self::window_price_book()],
            campaigns: vec![Self::campaign_100()],
            promo_codes: vec![Self::promo_1000(), Self::promo_min_5000()],
            tax_rules: vec![Self::moscow_tax(), Self::inactive_tax()],
        }
    }

    /// The canonical data set as JSON, in the format the CLI reads
    pub fn reference_data_json() -> String {
        serde_json::to_string_pretty(&Self::reference_data()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_data_round_trips_through_json() {
        let json = PricingFixtures::reference_data_json();
        let parsed: ReferenceDataSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, PricingFixtures::reference_data());
    }

    #[test]
    fn test_campaign_window_contains_now() {
        assert!(TemporalFixtures::june().contains(TemporalFixtures::now()));
        assert!(!TemporalFixtures::last_year().contains(TemporalFixtures::now()));
    }
}
