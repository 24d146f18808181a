//! Tax calculation service

use rust_decimal::Decimal;

use core_kernel::Money;
use crate::error::PricingError;
use crate::tax_rule::TaxRule;
use crate::trace::{PricingStep, TraceEntry};

/// Tax amount together with its audit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxOutcome {
    pub tax: Money,
    pub entry: TraceEntry,
}

/// Computes tax on the post-discount subtotal
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxCalculationService;

impl TaxCalculationService {
    pub fn new() -> Self {
        Self
    }

    /// Tax on `taxable_base` under `tax_rule`
    ///
    /// A missing or inactive rule yields zero tax and a "no tax" entry.
    pub fn calculate_tax(
        &self,
        taxable_base: &Money,
        tax_rule: Option<&TaxRule>,
    ) -> Result<TaxOutcome, PricingError> {
        let rule = match tax_rule {
            Some(rule) if rule.active => rule,
            Some(rule) => {
                return Ok(Self::no_tax(
                    taxable_base,
                    format!("region {} rule inactive", rule.region),
                ))
            }
            None => return Ok(Self::no_tax(taxable_base, "no tax rule supplied".to_string())),
        };

        if rule.rate_percent < Decimal::ZERO {
            return Err(PricingError::invalid_reference_data(format!(
                "negative tax rate {} for region {}",
                rule.rate_percent, rule.region
            )));
        }

        let tax = rule.rate().apply(taxable_base)?;
        let entry = TraceEntry::new(
            PricingStep::Tax,
            format!("region {} rate {}", rule.region, rule.rate()),
            format!("{} on {}", tax.to_plain_string(), taxable_base.to_plain_string()),
        );

        Ok(TaxOutcome { tax, entry })
    }

    fn no_tax(taxable_base: &Money, reason: String) -> TaxOutcome {
        let tax = Money::zero(taxable_base.currency());
        TaxOutcome {
            tax,
            entry: TraceEntry::new(
                PricingStep::Tax,
                "NO_TAX",
                format!("{} ({})", tax.to_plain_string(), reason),
            ),
        }
    }
}
