//! Rounding service
//!
//! Applies a per-currency rounding policy to a final amount. Unless a
//! currency has an override, amounts are rounded half-up to two places.

use std::collections::HashMap;

use core_kernel::{Currency, Money, RoundingPolicy};
use crate::error::PricingError;
use crate::trace::{PricingStep, TraceEntry};

/// A rounded amount together with its audit entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundingOutcome {
    pub rounded: Money,
    pub entry: TraceEntry,
}

/// Currency table of rounding policies
#[derive(Debug, Clone, Default)]
pub struct RoundingService {
    default_policy: RoundingPolicy,
    overrides: HashMap<Currency, RoundingPolicy>,
}

impl RoundingService {
    /// Two places, half-up, for every currency
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides following each currency's ISO minor units (JPY rounds to whole yen)
    pub fn iso_minor_units() -> Self {
        Currency::ALL
            .iter()
            .filter(|c| c.decimal_places() != RoundingPolicy::DEFAULT.scale)
            .fold(Self::new(), |service, c| {
                service.with_override(*c, RoundingPolicy::for_currency(*c))
            })
    }

    /// Replaces the policy used for currencies without an override
    pub fn with_default(mut self, policy: RoundingPolicy) -> Self {
        self.default_policy = policy;
        self
    }

    /// Sets a currency-specific policy
    pub fn with_override(mut self, currency: Currency, policy: RoundingPolicy) -> Self {
        self.overrides.insert(currency, policy);
        self
    }

    /// The policy in force for a currency
    pub fn policy_for(&self, currency: Currency) -> RoundingPolicy {
        self.overrides
            .get(&currency)
            .copied()
            .unwrap_or(self.default_policy)
    }

    /// Rounds `money`, which must be denominated in `currency`
    ///
    /// The trace entry records the amounts before and after rounding and the
    /// mode and scale used.
    pub fn round(&self, money: &Money, currency: Currency) -> Result<RoundingOutcome, PricingError> {
        money.ensure_currency(currency)?;
        let policy = self.policy_for(currency);
        let rounded = money.round_with(&policy);

        let entry = TraceEntry::new(
            PricingStep::Rounding,
            policy.to_string(),
            format!(
                "{} -> {:.dp$} {}",
                money.to_plain_string(),
                rounded.amount(),
                currency,
                dp = policy.scale as usize
            ),
        );

        Ok(RoundingOutcome { rounded, entry })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::RoundingMode;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_is_two_places_half_up() {
        let service = RoundingService::new();
        let outcome = service
            .round(&Money::new(dec!(881.995), Currency::RUB), Currency::RUB)
            .unwrap();

        assert_eq!(outcome.rounded.amount(), dec!(882.00));
        assert_eq!(outcome.entry.step, PricingStep::Rounding);
        assert_eq!(outcome.entry.rule_applied, "HALF_UP scale=2");
        assert_eq!(outcome.entry.result, "881.995 RUB -> 882.00 RUB");
    }

    #[test]
    fn test_override_wins() {
        let service = RoundingService::new()
            .with_override(Currency::CHF, RoundingPolicy::new(1, RoundingMode::HalfEven));
        assert_eq!(service.policy_for(Currency::CHF).scale, 1);
        assert_eq!(service.policy_for(Currency::RUB), RoundingPolicy::DEFAULT);
    }

    #[test]
    fn test_iso_minor_units_rounds_yen_to_whole() {
        let service = RoundingService::iso_minor_units();
        let outcome = service
            .round(&Money::new(dec!(1234.5), Currency::JPY), Currency::JPY)
            .unwrap();
        assert_eq!(outcome.rounded.amount(), dec!(1235));
    }

    #[test]
    fn test_currency_must_match() {
        let service = RoundingService::new();
        assert!(matches!(
            service.round(&Money::new(dec!(1), Currency::RUB), Currency::EUR),
            Err(PricingError::CurrencyMismatch { .. })
        ));
    }
}
