//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating pricing inputs that respect
//! domain invariants (positive dimensions, sane rates, one currency).

use core_kernel::{Currency, Money, RoundingMode};
use domain_pricing::DiscountRule;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for generating valid Currency values
pub fn currency_strategy() -> impl Strategy<Value = Currency> {
    prop_oneof![
        Just(Currency::RUB),
        Just(Currency::USD),
        Just(Currency::EUR),
        Just(Currency::GBP),
        Just(Currency::JPY),
        Just(Currency::CHF),
        Just(Currency::KZT),
        Just(Currency::PLN),
    ]
}

/// Strategy for rounding modes
pub fn rounding_mode_strategy() -> impl Strategy<Value = RoundingMode> {
    prop_oneof![
        Just(RoundingMode::HalfUp),
        Just(RoundingMode::HalfEven),
        Just(RoundingMode::Down),
        Just(RoundingMode::Up),
    ]
}

/// Strategy for RUB subtotals between 0.01 and 10 000 000.00
pub fn rub_subtotal_strategy() -> impl Strategy<Value = Money> {
    (1i64..1_000_000_000i64).prop_map(|minor| Money::from_minor(minor, Currency::RUB))
}

/// Strategy for percentages from 0.00 to 100.00
pub fn percentage_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=10000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for tax rates from 0% to 30%
pub fn tax_rate_strategy() -> impl Strategy<Value = Decimal> {
    (0u32..=3000u32).prop_map(|n| Decimal::new(n as i64, 2))
}

/// Strategy for window and door dimensions from 10.0 to 400.0 cm
pub fn dimension_cm_strategy() -> impl Strategy<Value = Decimal> {
    (100i64..=4000i64).prop_map(|n| Decimal::new(n, 1))
}

/// Strategy for RUB discount rules of either kind
pub fn rub_discount_rule_strategy() -> impl Strategy<Value = DiscountRule> {
    prop_oneof![
        percentage_strategy().prop_map(DiscountRule::percentage),
        (0i64..500_000_000i64)
            .prop_map(|minor| DiscountRule::fixed(Money::from_minor(minor, Currency::RUB))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn subtotal_is_always_positive(subtotal in rub_subtotal_strategy()) {
            prop_assert!(subtotal.is_positive());
        }

        #[test]
        fn percentage_is_in_range(percent in percentage_strategy()) {
            prop_assert!(percent >= Decimal::ZERO);
            prop_assert!(percent <= Decimal::ONE_HUNDRED);
        }

        #[test]
        fn zero_stays_zero_in_any_currency(currency in currency_strategy()) {
            let zero = Money::zero(currency);
            prop_assert!(zero.is_zero());
            prop_assert_eq!(zero.currency(), currency);
        }

        #[test]
        fn dimensions_are_positive(cm in dimension_cm_strategy()) {
            prop_assert!(cm > Decimal::ZERO);
        }
    }
}
