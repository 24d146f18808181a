//! Decision trace
//!
//! An ordered, append-only record of every pricing stage. Services never
//! write into a shared trace; each one returns the entries it produced and
//! the orchestrator appends them in pipeline order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named stage of the pricing pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingStep {
    BasePrice,
    OptionPremiums,
    Subtotal,
    CampaignDiscount,
    PromoCode,
    DiscountCapApplied,
    DiscountTotal,
    TaxableBase,
    Tax,
    Rounding,
}

impl PricingStep {
    pub fn name(&self) -> &'static str {
        match self {
            PricingStep::BasePrice => "BASE_PRICE",
            PricingStep::OptionPremiums => "OPTION_PREMIUMS",
            PricingStep::Subtotal => "SUBTOTAL",
            PricingStep::CampaignDiscount => "CAMPAIGN_DISCOUNT",
            PricingStep::PromoCode => "PROMO_CODE",
            PricingStep::DiscountCapApplied => "DISCOUNT_CAP_APPLIED",
            PricingStep::DiscountTotal => "DISCOUNT_TOTAL",
            PricingStep::TaxableBase => "TAXABLE_BASE",
            PricingStep::Tax => "TAX",
            PricingStep::Rounding => "ROUNDING",
        }
    }
}

impl fmt::Display for PricingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One line of the decision trace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Pipeline stage
    pub step: PricingStep,
    /// The rule or source that decided this stage
    pub rule_applied: String,
    /// Outcome of the stage
    pub result: String,
}

impl TraceEntry {
    pub fn new(step: PricingStep, rule_applied: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            step,
            rule_applied: rule_applied.into(),
            result: result.into(),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} => {}", self.step, self.rule_applied, self.result)
    }
}

/// Accumulator owned by a single calculation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionTrace {
    entries: Vec<TraceEntry>,
}

impl DecisionTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry
    pub fn record(&mut self, entry: TraceEntry) {
        tracing::trace!(step = %entry.step, rule = %entry.rule_applied, result = %entry.result, "pricing step");
        self.entries.push(entry);
    }

    /// Appends entries in the order given
    pub fn extend(&mut self, entries: impl IntoIterator<Item = TraceEntry>) {
        for entry in entries {
            self.record(entry);
        }
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Steps in recorded order
    pub fn steps(&self) -> Vec<PricingStep> {
        self.entries.iter().map(|e| e.step).collect()
    }

    pub fn into_entries(self) -> Vec<TraceEntry> {
        self.entries
    }
}
