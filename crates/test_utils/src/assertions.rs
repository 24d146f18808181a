//! Custom Test Assertions
//!
//! Assertion helpers for money and decision traces that give more
//! meaningful failure messages than plain `assert_eq!`.

use core_kernel::Money;
use domain_pricing::{PricingStep, Quote, TraceEntry, MAX_DISCOUNT_SHARE};
use rust_decimal::Decimal;

/// Asserts that a Money value has exactly the given amount, ignoring scale
///
/// # Panics
///
/// Panics if the amounts differ numerically
pub fn assert_money_eq(actual: &Money, expected: Decimal) {
    assert_eq!(
        actual.amount().normalize(),
        expected.normalize(),
        "Money mismatch: actual={}, expected={} {}",
        actual.to_plain_string(),
        expected,
        actual.currency()
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(
        money.is_zero(),
        "Expected zero money, got {}",
        money.to_plain_string()
    );
}

/// Asserts that the trace contains exactly these steps, in this order
pub fn assert_trace_steps(trace: &[TraceEntry], expected: &[PricingStep]) {
    let actual: Vec<PricingStep> = trace.iter().map(|e| e.step).collect();
    assert_eq!(
        actual, expected,
        "Decision trace steps differ:\n{}",
        trace
            .iter()
            .map(|e| format!("  {}", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Returns the single trace entry for a step
///
/// # Panics
///
/// Panics if the step is missing or recorded more than once
pub fn trace_entry(trace: &[TraceEntry], step: PricingStep) -> &TraceEntry {
    let mut matching = trace.iter().filter(|e| e.step == step);
    let entry = matching
        .next()
        .unwrap_or_else(|| panic!("No {} entry in decision trace", step));
    assert!(matching.next().is_none(), "More than one {} entry in decision trace", step);
    entry
}

/// Asserts the arithmetic identities every quote must satisfy
///
/// - subtotal = base price + option premiums
/// - discount ≤ 30% of subtotal
/// - taxable base = subtotal - discount
/// - total = taxable base + tax, within the rounding tolerance of the currency
pub fn assert_quote_consistent(quote: &Quote) {
    let options: Decimal = quote.option_premiums().iter().map(|l| l.amount.amount()).sum();
    assert_eq!(
        quote.subtotal().amount(),
        quote.base_price().amount() + options,
        "subtotal is not base + options"
    );

    let cap = quote.subtotal().amount() * MAX_DISCOUNT_SHARE;
    assert!(
        quote.discount().amount() <= cap,
        "discount {} exceeds cap {}",
        quote.discount().amount(),
        cap
    );

    assert_eq!(
        quote.taxable_base().amount(),
        quote.subtotal().amount() - quote.discount().amount(),
        "taxable base is not subtotal - discount"
    );

    let unrounded = quote.taxable_base().amount() + quote.tax().amount();
    let tolerance = Decimal::new(5, quote.currency().decimal_places() + 1);
    assert!(
        (quote.total().amount() - unrounded).abs() <= tolerance,
        "total {} is not round({})",
        quote.total().amount(),
        unrounded
    );
}
