//! Discount service
//!
//! Discounts are resolved in a fixed order:
//!
//! 1. the single best campaign (largest absolute amount on the subtotal),
//! 2. the promo code, evaluated independently of the campaign outcome,
//! 3. the cap: campaign + promo may never exceed 30% of the subtotal.
//!
//! Campaign and promo amounts are both computed against the same
//! pre-discount subtotal and summed; they do not compound.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use core_kernel::{CampaignId, Money, ProductTemplateId, Rate};
use crate::campaign::Campaign;
use crate::error::{PricingError, PromoRejection};
use crate::promo_code::{normalize_code, PromoCode};
use crate::trace::{PricingStep, TraceEntry};

/// Largest share of the subtotal that discounts may take
pub const MAX_DISCOUNT_SHARE: Decimal = dec!(0.30);

/// The promo code supplied with a request, as resolved by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromoSelection<'a> {
    /// The customer did not enter a code
    NotRequested,
    /// The customer entered a code that does not exist
    NotFound { code: &'a str },
    /// The code exists
    Found(&'a PromoCode),
}

/// What happened to the promo code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromoOutcome {
    NotRequested,
    Applied { code: String, amount: Money },
    Rejected { code: String, reason: PromoRejection },
}

impl PromoOutcome {
    pub fn rejection(&self) -> Option<(&str, PromoRejection)> {
        match self {
            PromoOutcome::Rejected { code, reason } => Some((code.as_str(), *reason)),
            _ => None,
        }
    }
}

/// Result of the discount stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscountOutcome {
    /// Winning campaign, if any qualified
    pub campaign_id: Option<CampaignId>,
    pub campaign_discount: Money,
    pub promo: PromoOutcome,
    pub promo_discount: Money,
    /// Campaign plus promo before the cap
    pub uncapped_total: Money,
    /// Discount actually granted
    pub total: Money,
    pub cap_applied: bool,
    /// Trace entries in the order the sub-steps ran
    pub entries: Vec<TraceEntry>,
}

/// Selects and caps discounts
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscountService;

impl DiscountService {
    pub fn new() -> Self {
        Self
    }

    /// The maximum discount allowed on `subtotal`
    pub fn discount_cap(subtotal: &Money) -> Result<Money, PricingError> {
        Ok(Rate::new(MAX_DISCOUNT_SHARE).apply(subtotal)?)
    }

    /// Campaign discount, promo discount and cap for one subtotal
    pub fn calculate_total_discount(
        &self,
        subtotal: &Money,
        product: &ProductTemplateId,
        campaigns: &[Campaign],
        promo: PromoSelection<'_>,
        now: DateTime<Utc>,
    ) -> Result<DiscountOutcome, PricingError> {
        let mut entries = Vec::with_capacity(4);
        let zero = Money::zero(subtotal.currency());

        let best = self.best_campaign(subtotal, product, campaigns, now)?;
        let (campaign_id, campaign_discount) = match &best {
            Some((campaign, amount)) => {
                entries.push(TraceEntry::new(
                    PricingStep::CampaignDiscount,
                    format!("CAMPAIGN {} \"{}\" {}", campaign.id, campaign.name, campaign.discount_rule),
                    amount.to_plain_string(),
                ));
                (Some(campaign.id), *amount)
            }
            None => {
                entries.push(TraceEntry::new(
                    PricingStep::CampaignDiscount,
                    "NONE",
                    format!(
                        "{} (no qualifying campaign among {})",
                        zero.to_plain_string(),
                        campaigns.len()
                    ),
                ));
                (None, zero)
            }
        };

        let promo_outcome = self.evaluate_promo(subtotal, promo, now)?;
        let promo_discount = match &promo_outcome {
            PromoOutcome::Applied { amount, .. } => *amount,
            _ => zero,
        };
        entries.push(Self::promo_entry(&promo_outcome, promo));

        let uncapped_total = campaign_discount.add(&promo_discount)?;
        let cap = Self::discount_cap(subtotal)?;
        let cap_applied = uncapped_total.is_greater_than(&cap)?;
        let total = if cap_applied {
            entries.push(TraceEntry::new(
                PricingStep::DiscountCapApplied,
                format!("MAX {} OF SUBTOTAL {}", Rate::new(MAX_DISCOUNT_SHARE), subtotal.to_plain_string()),
                format!("{} -> {}", uncapped_total.to_plain_string(), cap.to_plain_string()),
            ));
            cap
        } else {
            uncapped_total
        };

        entries.push(TraceEntry::new(
            PricingStep::DiscountTotal,
            "CAMPAIGN + PROMO",
            total.to_plain_string(),
        ));

        tracing::debug!(
            campaign = ?campaign_id,
            campaign_discount = %campaign_discount.amount(),
            promo_discount = %promo_discount.amount(),
            total = %total.amount(),
            cap_applied,
            "discounts resolved"
        );

        Ok(DiscountOutcome {
            campaign_id,
            campaign_discount,
            promo: promo_outcome,
            promo_discount,
            uncapped_total,
            total,
            cap_applied,
            entries,
        })
    }

    /// The active campaign granting the largest amount on `subtotal`
    ///
    /// Ties go to the higher priority, then to the smaller campaign id so the
    /// choice never depends on input order.
    pub fn best_campaign<'c>(
        &self,
        subtotal: &Money,
        product: &ProductTemplateId,
        campaigns: &'c [Campaign],
        now: DateTime<Utc>,
    ) -> Result<Option<(&'c Campaign, Money)>, PricingError> {
        let mut best: Option<(&Campaign, Money)> = None;

        for campaign in campaigns.iter().filter(|c| c.is_active_for(product, now)) {
            let amount = campaign.discount_rule.amount_for(subtotal)?;
            let better = match &best {
                None => true,
                Some((current, current_amount)) => {
                    let candidate_key = (amount.amount(), campaign.priority, Reverse(campaign.id));
                    let current_key = (current_amount.amount(), current.priority, Reverse(current.id));
                    candidate_key > current_key
                }
            };
            if better {
                best = Some((campaign, amount));
            }
        }

        Ok(best)
    }

    /// Validates the promo code for `subtotal` at `now` and computes its discount
    pub fn evaluate_promo(
        &self,
        subtotal: &Money,
        promo: PromoSelection<'_>,
        now: DateTime<Utc>,
    ) -> Result<PromoOutcome, PricingError> {
        match promo {
            PromoSelection::NotRequested => Ok(PromoOutcome::NotRequested),
            PromoSelection::NotFound { code } => Ok(PromoOutcome::Rejected {
                code: normalize_code(code),
                reason: PromoRejection::NotFound,
            }),
            PromoSelection::Found(promo_code) => {
                let code = promo_code.normalized_code();
                match promo_code.rejection(subtotal, now)? {
                    Some(reason) => Ok(PromoOutcome::Rejected { code, reason }),
                    None => Ok(PromoOutcome::Applied {
                        amount: promo_code.discount_for(subtotal)?,
                        code,
                    }),
                }
            }
        }
    }

    fn promo_entry(outcome: &PromoOutcome, selection: PromoSelection<'_>) -> TraceEntry {
        match outcome {
            PromoOutcome::NotRequested => {
                TraceEntry::new(PricingStep::PromoCode, "NONE", "no promo code supplied")
            }
            PromoOutcome::Applied { code, amount } => {
                let rule = match selection {
                    PromoSelection::Found(promo) => format!("PROMO {} {}", code, promo.discount),
                    _ => format!("PROMO {}", code),
                };
                TraceEntry::new(
                    PricingStep::PromoCode,
                    rule,
                    format!("APPLIED {}", amount.to_plain_string()),
                )
            }
            PromoOutcome::Rejected { code, reason } => TraceEntry::new(
                PricingStep::PromoCode,
                format!("PROMO {}", code),
                format!("INVALID {} ({})", reason.code(), reason),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::CampaignStatus;
    use crate::discount_rule::DiscountRule;
    use chrono::TimeZone;
    use core_kernel::{Currency, ValidityWindow};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn rub(amount: Decimal) -> Money {
        Money::new(amount, Currency::RUB)
    }

    fn campaign(rule: DiscountRule, priority: i32) -> Campaign {
        Campaign {
            id: CampaignId::new(),
            name: "test".to_string(),
            discount_rule: rule,
            applicable_product_ids: Default::default(),
            validity: ValidityWindow::unbounded(),
            priority,
            status: CampaignStatus::Active,
        }
    }

    fn product() -> ProductTemplateId {
        ProductTemplateId::new("WINDOW-PVC-2")
    }

    #[test]
    fn test_best_campaign_is_highest_amount_not_highest_percentage() {
        // 10% of 500 = 50, fixed 80 wins
        let campaigns = vec![
            campaign(DiscountRule::percentage(dec!(10)), 5),
            campaign(DiscountRule::fixed(rub(dec!(80))), 0),
        ];
        let best = DiscountService::new()
            .best_campaign(&rub(dec!(500)), &product(), &campaigns, now())
            .unwrap()
            .unwrap();
        assert_eq!(best.1.amount(), dec!(80));
        assert_eq!(best.0.id, campaigns[1].id);
    }

    #[test]
    fn test_equal_amounts_fall_back_to_priority() {
        let campaigns = vec![
            campaign(DiscountRule::fixed(rub(dec!(50))), 1),
            campaign(DiscountRule::percentage(dec!(10)), 7),
        ];
        let best = DiscountService::new()
            .best_campaign(&rub(dec!(500)), &product(), &campaigns, now())
            .unwrap()
            .unwrap();
        assert_eq!(best.0.priority, 7);
    }

    #[test]
    fn test_no_campaigns_records_none() {
        let outcome = DiscountService::new()
            .calculate_total_discount(&rub(dec!(500)), &product(), &[], PromoSelection::NotRequested, now())
            .unwrap();

        assert!(outcome.total.is_zero());
        assert_eq!(outcome.entries[0].step, PricingStep::CampaignDiscount);
        assert_eq!(outcome.entries[0].rule_applied, "NONE");
        assert_eq!(outcome.entries[1].rule_applied, "NONE");
        assert!(!outcome.cap_applied);
    }

    #[test]
    fn test_cap_clamps_to_thirty_percent() {
        let campaigns = vec![campaign(DiscountRule::fixed(rub(dec!(100))), 0)];
        let promo = PromoCode {
            code: "BIG".to_string(),
            discount: DiscountRule::fixed(rub(dec!(1000))),
            min_subtotal: None,
            usage_limit: None,
            usage_count: 0,
            validity: ValidityWindow::unbounded(),
        };
        let outcome = DiscountService::new()
            .calculate_total_discount(
                &rub(dec!(1050)),
                &product(),
                &campaigns,
                PromoSelection::Found(&promo),
                now(),
            )
            .unwrap();

        assert_eq!(outcome.uncapped_total.amount(), dec!(1100));
        assert_eq!(outcome.total.amount(), dec!(315));
        assert!(outcome.cap_applied);
        let cap = outcome
            .entries
            .iter()
            .find(|e| e.step == PricingStep::DiscountCapApplied)
            .unwrap();
        assert_eq!(cap.result, "1100 RUB -> 315 RUB");
    }

    #[test]
    fn test_unknown_promo_is_rejected_not_failed() {
        let outcome = DiscountService::new()
            .evaluate_promo(&rub(dec!(100)), PromoSelection::NotFound { code: "nope" }, now())
            .unwrap();
        assert_eq!(outcome.rejection(), Some(("NOPE", PromoRejection::NotFound)));
    }
}
