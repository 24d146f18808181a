//! Test Data Builders
//!
//! Builder patterns for constructing pricing reference data with sensible
//! defaults. Tests set only the fields they care about.

use core_kernel::{CampaignId, Currency, Money, OptionId, ProductTemplateId, ValidityWindow};
use domain_pricing::{
    Campaign, CampaignStatus, DiscountRule, OptionPremium, PriceBook, PriceBookStatus, PromoCode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, BTreeSet};

use crate::fixtures::{IdFixtures, MoneyFixtures, StringFixtures, TemporalFixtures};

/// Builder for price books
pub struct PriceBookBuilder {
    product_template_id: ProductTemplateId,
    currency: Currency,
    base_price_per_area: Money,
    minimum_area: Decimal,
    minimum_charge: Option<Money>,
    option_premiums: BTreeMap<OptionId, OptionPremium>,
    status: PriceBookStatus,
    version: u32,
}

impl Default for PriceBookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceBookBuilder {
    /// Active RUB book for the window product with a 50 RUB sill
    pub fn new() -> Self {
        Self {
            product_template_id: IdFixtures::window_product(),
            currency: Currency::RUB,
            base_price_per_area: MoneyFixtures::rub_1000(),
            minimum_area: Decimal::ZERO,
            minimum_charge: None,
            option_premiums: BTreeMap::new(),
            status: PriceBookStatus::Active,
            version: 1,
        }
        .with_option(StringFixtures::sill_option(), "Window sill", MoneyFixtures::rub_50())
    }

    pub fn with_product(mut self, product: impl Into<ProductTemplateId>) -> Self {
        self.product_template_id = product.into();
        self
    }

    /// Switches the currency of the book and of its area rate
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self.base_price_per_area = Money::new(self.base_price_per_area.amount(), currency);
        self
    }

    pub fn with_base_price_per_area(mut self, amount: Money) -> Self {
        self.base_price_per_area = amount;
        self
    }

    pub fn with_minimum_area(mut self, area: Decimal) -> Self {
        self.minimum_area = area;
        self
    }

    pub fn with_minimum_charge(mut self, charge: Money) -> Self {
        self.minimum_charge = Some(charge);
        self
    }

    pub fn with_option(mut self, id: &str, name: &str, amount: Money) -> Self {
        self.option_premiums.insert(
            OptionId::new(id),
            OptionPremium {
                name: name.to_string(),
                amount,
            },
        );
        self
    }

    pub fn without_options(mut self) -> Self {
        self.option_premiums.clear();
        self
    }

    pub fn draft(mut self) -> Self {
        self.status = PriceBookStatus::Draft;
        self
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn build(self) -> PriceBook {
        PriceBook {
            product_template_id: self.product_template_id,
            currency: self.currency,
            base_price_per_area: self.base_price_per_area,
            minimum_area: self.minimum_area,
            minimum_charge: self.minimum_charge,
            option_premiums: self.option_premiums,
            status: self.status,
            version: self.version,
        }
    }
}

/// Builder for campaigns
pub struct CampaignBuilder {
    id: CampaignId,
    name: String,
    discount_rule: DiscountRule,
    applicable_product_ids: BTreeSet<ProductTemplateId>,
    validity: ValidityWindow,
    priority: i32,
    status: CampaignStatus,
}

impl Default for CampaignBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CampaignBuilder {
    /// Active 10% June campaign on the window product
    pub fn new() -> Self {
        Self {
            id: CampaignId::new(),
            name: "Summer windows".to_string(),
            discount_rule: DiscountRule::percentage(dec!(10)),
            applicable_product_ids: [IdFixtures::window_product()].into_iter().collect(),
            validity: TemporalFixtures::june(),
            priority: 0,
            status: CampaignStatus::Active,
        }
    }

    pub fn with_id(mut self, id: CampaignId) -> Self {
        self.id = id;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rule(mut self, rule: DiscountRule) -> Self {
        self.discount_rule = rule;
        self
    }

    /// Restricts the campaign to the given products
    pub fn for_products(mut self, products: &[&str]) -> Self {
        self.applicable_product_ids = products.iter().map(|p| ProductTemplateId::new(*p)).collect();
        self
    }

    /// Makes the campaign apply to every product
    pub fn for_all_products(mut self) -> Self {
        self.applicable_product_ids.clear();
        self
    }

    pub fn with_validity(mut self, validity: ValidityWindow) -> Self {
        self.validity = validity;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn expired(mut self) -> Self {
        self.status = CampaignStatus::Expired;
        self
    }

    pub fn build(self) -> Campaign {
        Campaign {
            id: self.id,
            name: self.name,
            discount_rule: self.discount_rule,
            applicable_product_ids: self.applicable_product_ids,
            validity: self.validity,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Builder for promo codes
pub struct PromoCodeBuilder {
    code: String,
    discount: DiscountRule,
    min_subtotal: Option<Money>,
    usage_limit: Option<u32>,
    usage_count: u32,
    validity: ValidityWindow,
}

impl PromoCodeBuilder {
    /// Unrestricted 5% code valid in June
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            discount: DiscountRule::percentage(dec!(5)),
            min_subtotal: None,
            usage_limit: None,
            usage_count: 0,
            validity: TemporalFixtures::june(),
        }
    }

    pub fn with_rule(mut self, rule: DiscountRule) -> Self {
        self.discount = rule;
        self
    }

    pub fn with_min_subtotal(mut self, minimum: Money) -> Self {
        self.min_subtotal = Some(minimum);
        self
    }

    pub fn with_usage(mut self, count: u32, limit: u32) -> Self {
        self.usage_count = count;
        self.usage_limit = Some(limit);
        self
    }

    pub fn with_validity(mut self, validity: ValidityWindow) -> Self {
        self.validity = validity;
        self
    }

    pub fn build(self) -> PromoCode {
        PromoCode {
            code: self.code,
            discount: self.discount,
            min_subtotal: self.min_subtotal,
            usage_limit: self.usage_limit,
            usage_count: self.usage_count,
            validity: self.validity,
        }
    }
}
