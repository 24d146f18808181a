//! Property-based checks of the pricing invariants

use core_kernel::{Currency, Money, RoundingPolicy};
use domain_pricing::{
    DiscountService, PriceCalculationService, PromoSelection, QuoteInputs, TaxRule,
    MAX_DISCOUNT_SHARE,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use test_utils::{
    assert_quote_consistent, dimension_cm_strategy, rounding_mode_strategy,
    rub_discount_rule_strategy, rub_subtotal_strategy, tax_rate_strategy, CampaignBuilder,
    IdFixtures, PriceBookBuilder, PromoCodeBuilder, TemporalFixtures,
};

proptest! {
    #[test]
    fn discount_never_exceeds_cap(
        subtotal in rub_subtotal_strategy(),
        campaign_rule in rub_discount_rule_strategy(),
        promo_rule in rub_discount_rule_strategy(),
    ) {
        let campaigns = vec![CampaignBuilder::new().with_rule(campaign_rule).build()];
        let promo = PromoCodeBuilder::new("ANY").with_rule(promo_rule).build();

        let outcome = DiscountService::new()
            .calculate_total_discount(
                &subtotal,
                &IdFixtures::window_product(),
                &campaigns,
                PromoSelection::Found(&promo),
                TemporalFixtures::now(),
            )
            .unwrap();

        prop_assert!(outcome.total.amount() <= subtotal.amount() * MAX_DISCOUNT_SHARE);
        prop_assert!(outcome.total.amount() >= Decimal::ZERO);
        prop_assert_eq!(outcome.cap_applied, outcome.total != outcome.uncapped_total);
    }

    #[test]
    fn discount_is_monotonic_in_subtotal(
        low in rub_subtotal_strategy(),
        bump_minor in 0i64..100_000_000i64,
        campaign_rule in rub_discount_rule_strategy(),
        promo_rule in rub_discount_rule_strategy(),
    ) {
        let high = low.add(&Money::from_minor(bump_minor, Currency::RUB)).unwrap();
        let campaigns = vec![CampaignBuilder::new().with_rule(campaign_rule).build()];
        let promo = PromoCodeBuilder::new("ANY").with_rule(promo_rule).build();
        let service = DiscountService::new();
        let discount_at = |subtotal: &Money| {
            service
                .calculate_total_discount(
                    subtotal,
                    &IdFixtures::window_product(),
                    &campaigns,
                    PromoSelection::Found(&promo),
                    TemporalFixtures::now(),
                )
                .unwrap()
                .total
        };

        prop_assert!(discount_at(&high).amount() >= discount_at(&low).amount());
    }

    #[test]
    fn quote_totals_are_consistent(
        width in dimension_cm_strategy(),
        height in dimension_cm_strategy(),
        campaign_rule in rub_discount_rule_strategy(),
        rate in tax_rate_strategy(),
    ) {
        let book = PriceBookBuilder::new().build();
        let campaigns = vec![CampaignBuilder::new().with_rule(campaign_rule).build()];
        let tax = TaxRule::new("RU-MOW", rate, true);

        let quote = PriceCalculationService::default()
            .calculate_quote(QuoteInputs {
                price_book: &book,
                selected_option_ids: &[],
                width_cm: width,
                height_cm: height,
                currency: Currency::RUB,
                campaigns: &campaigns,
                promo: PromoSelection::NotRequested,
                tax_rule: Some(&tax),
                quote_ttl_minutes: 30,
                now: TemporalFixtures::now(),
            })
            .unwrap();

        assert_quote_consistent(&quote);
        prop_assert_eq!(quote.total().amount().round_dp(2), quote.total().amount());
    }

    #[test]
    fn rounding_is_idempotent(
        minor in 0i64..1_000_000_000i64,
        scale in 0u32..5u32,
        mode in rounding_mode_strategy(),
    ) {
        let policy = RoundingPolicy::new(scale, mode);
        let amount = Decimal::new(minor, 6);
        let once = policy.apply(amount);
        prop_assert_eq!(policy.apply(once), once);
        prop_assert!((once - amount).abs() < Decimal::new(1, scale));
    }
}
