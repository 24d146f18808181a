//! Promotional campaigns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{CampaignId, ProductTemplateId, ValidityWindow};
use crate::discount_rule::DiscountRule;

/// Campaign lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CampaignStatus {
    Active,
    Expired,
}

/// A time-boxed, product-scoped discount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: CampaignId,
    #[serde(default)]
    pub name: String,
    pub discount_rule: DiscountRule,
    /// Products the campaign applies to; empty means every product
    #[serde(default)]
    pub applicable_product_ids: BTreeSet<ProductTemplateId>,
    pub validity: ValidityWindow,
    /// Higher wins when two campaigns grant the same amount
    #[serde(default)]
    pub priority: i32,
    pub status: CampaignStatus,
}

impl Campaign {
    /// Returns true if the product is in scope for this campaign
    pub fn applies_to(&self, product: &ProductTemplateId) -> bool {
        self.applicable_product_ids.is_empty() || self.applicable_product_ids.contains(product)
    }

    /// Returns true if the campaign may discount `product` at `now`
    pub fn is_active_for(&self, product: &ProductTemplateId, now: DateTime<Utc>) -> bool {
        self.status == CampaignStatus::Active
            && self.validity.contains(now)
            && self.applies_to(product)
    }
}
