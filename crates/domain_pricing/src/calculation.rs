//! Price calculation service
//!
//! Orchestrates the pricing pipeline. Each stage is a pure function of the
//! inputs; the trace is an accumulator local to the call and is moved into
//! the finished quote. On any error nothing is returned but the error.
//!
//! ```text
//! base price ─► option premiums ─► subtotal ─► discounts (capped)
//!     ─► taxable base ─► tax ─► round(taxable base + tax) ─► Quote
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

use core_kernel::{temporal, Currency, Money, OptionId};
use crate::campaign::Campaign;
use crate::discount::{DiscountService, PromoOutcome, PromoSelection};
use crate::error::PricingError;
use crate::price_book::PriceBook;
use crate::quote::{PremiumLine, Quote, QuoteAmounts};
use crate::rounding::RoundingService;
use crate::tax::TaxCalculationService;
use crate::tax_rule::TaxRule;
use crate::trace::{DecisionTrace, PricingStep, TraceEntry};

/// Everything one calculation needs, already loaded from the read ports
#[derive(Debug, Clone)]
pub struct QuoteInputs<'a> {
    pub price_book: &'a PriceBook,
    pub selected_option_ids: &'a [OptionId],
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    /// Currency the caller expects the quote in
    pub currency: Currency,
    pub campaigns: &'a [Campaign],
    pub promo: PromoSelection<'a>,
    pub tax_rule: Option<&'a TaxRule>,
    pub quote_ttl_minutes: i64,
    pub now: DateTime<Utc>,
}

/// Turns a price book, campaigns, a promo code and a tax rule into a quote
#[derive(Debug, Clone, Default)]
pub struct PriceCalculationService {
    rounding: RoundingService,
    discounts: DiscountService,
    tax: TaxCalculationService,
    strict_promo_codes: bool,
}

impl PriceCalculationService {
    pub fn new(rounding: RoundingService) -> Self {
        Self {
            rounding,
            discounts: DiscountService::new(),
            tax: TaxCalculationService::new(),
            strict_promo_codes: false,
        }
    }

    /// Fail with `InvalidPromoCode` instead of ignoring a rejected code
    pub fn with_strict_promo_codes(mut self, strict: bool) -> Self {
        self.strict_promo_codes = strict;
        self
    }

    /// Runs the full pipeline
    ///
    /// # Errors
    ///
    /// - `PriceBookNotFound` if the price book is not active
    /// - `CurrencyMismatch` if any amount disagrees with the requested currency
    /// - `InvalidDimensions` for non-positive or out-of-range width or height
    /// - `InvalidTtl` for a negative lifetime or one that ends past the date range
    /// - `InvalidPromoCode` for a rejected code when strict promo handling is on
    pub fn calculate_quote(&self, inputs: QuoteInputs<'_>) -> Result<Quote, PricingError> {
        let book = inputs.price_book;
        if !book.is_active() {
            return Err(PricingError::PriceBookNotFound {
                product: book.product_template_id.clone(),
            });
        }
        if book.currency != inputs.currency {
            return Err(PricingError::CurrencyMismatch {
                expected: inputs.currency,
                actual: book.currency,
            });
        }
        let expires_at = temporal::expires_after(inputs.now, inputs.quote_ttl_minutes)
            .map_err(|_| PricingError::InvalidTtl(inputs.quote_ttl_minutes))?;

        let mut trace = DecisionTrace::new();

        // 1. base price
        let base = book.base_price(inputs.width_cm, inputs.height_cm)?;
        trace.record(TraceEntry::new(
            PricingStep::BasePrice,
            format!(
                "AREA {}cm x {}cm = {} m2, billable {} m2 at {}/m2{} (price book v{})",
                inputs.width_cm.normalize(),
                inputs.height_cm.normalize(),
                base.measured_area.normalize(),
                base.billable_area.normalize(),
                book.base_price_per_area.to_plain_string(),
                if base.minimum_charge_applied { ", MINIMUM_CHARGE" } else { "" },
                book.version,
            ),
            base.amount.to_plain_string(),
        ));

        // 2. option premiums
        let (option_premiums, options_total) = self.option_premiums(book, inputs.selected_option_ids, &mut trace)?;

        // 3. subtotal
        let subtotal = base.amount.add(&options_total)?;
        trace.record(TraceEntry::new(
            PricingStep::Subtotal,
            "BASE + OPTIONS",
            subtotal.to_plain_string(),
        ));

        // 4. discounts
        let discount = self.discounts.calculate_total_discount(
            &subtotal,
            &book.product_template_id,
            inputs.campaigns,
            inputs.promo,
            inputs.now,
        )?;
        if self.strict_promo_codes {
            if let PromoOutcome::Rejected { code, reason } = &discount.promo {
                return Err(PricingError::InvalidPromoCode {
                    code: code.clone(),
                    reason: *reason,
                });
            }
        }
        trace.extend(discount.entries);

        // 5. taxable base
        let taxable_base = subtotal.subtract(&discount.total)?;
        trace.record(TraceEntry::new(
            PricingStep::TaxableBase,
            "SUBTOTAL - DISCOUNT",
            taxable_base.to_plain_string(),
        ));

        // 6. tax on the discounted amount
        let tax = self.tax.calculate_tax(&taxable_base, inputs.tax_rule)?;
        trace.record(tax.entry);

        // 7. round once, at the total
        let gross = taxable_base.add(&tax.tax)?;
        let rounded = self.rounding.round(&gross, inputs.currency)?;
        trace.record(rounded.entry);

        let quote = Quote::new(
            book.product_template_id.clone(),
            book.version,
            inputs.currency,
            QuoteAmounts {
                base_price: base.amount,
                option_premiums,
                subtotal,
                discount: discount.total,
                taxable_base,
                tax: tax.tax,
                total: rounded.rounded,
            },
            inputs.now,
            expires_at,
            trace.into_entries(),
        );

        tracing::debug!(
            quote_id = %quote.quote_id(),
            product = %quote.product_template_id(),
            total = %quote.total(),
            "quote calculated"
        );

        Ok(quote)
    }

    /// Premium lines for the selected options, de-duplicated and in id order
    fn option_premiums(
        &self,
        book: &PriceBook,
        selected: &[OptionId],
        trace: &mut DecisionTrace,
    ) -> Result<(Vec<PremiumLine>, Money), PricingError> {
        let unique: BTreeSet<&OptionId> = selected.iter().collect();
        let mut lines = Vec::with_capacity(unique.len());
        let mut ignored = Vec::new();

        for option_id in unique {
            match book.option_premium(option_id) {
                Some(premium) => {
                    premium.amount.ensure_currency(book.currency)?;
                    lines.push(PremiumLine {
                        option_id: option_id.clone(),
                        option_name: premium.name.clone(),
                        amount: premium.amount,
                    });
                }
                None => ignored.push(option_id.to_string()),
            }
        }

        let total = Money::sum(book.currency, lines.iter().map(|l| &l.amount))?;

        let mut rule = if lines.is_empty() {
            "NONE".to_string()
        } else {
            lines
                .iter()
                .map(|l| format!("{}={}", l.option_id, l.amount.to_plain_string()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        if !ignored.is_empty() {
            rule.push_str(&format!("; ignored unknown: {}", ignored.join(", ")));
        }
        trace.record(TraceEntry::new(PricingStep::OptionPremiums, rule, total.to_plain_string()));

        Ok((lines, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::price_book::{OptionPremium, PriceBookStatus};
    use chrono::TimeZone;
    use core_kernel::ProductTemplateId;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn book() -> PriceBook {
        let mut option_premiums = BTreeMap::new();
        option_premiums.insert(
            OptionId::new("SILL"),
            OptionPremium {
                name: "Window sill".to_string(),
                amount: Money::new(dec!(50), Currency::RUB),
            },
        );
        PriceBook {
            product_template_id: ProductTemplateId::new("WINDOW-PVC-2"),
            currency: Currency::RUB,
            base_price_per_area: Money::new(dec!(1000), Currency::RUB),
            minimum_area: dec!(0),
            minimum_charge: None,
            option_premiums,
            status: PriceBookStatus::Active,
            version: 3,
        }
    }

    fn inputs<'a>(book: &'a PriceBook, options: &'a [OptionId]) -> QuoteInputs<'a> {
        QuoteInputs {
            price_book: book,
            selected_option_ids: options,
            width_cm: dec!(100),
            height_cm: dec!(100),
            currency: Currency::RUB,
            campaigns: &[],
            promo: PromoSelection::NotRequested,
            tax_rule: None,
            quote_ttl_minutes: 30,
            now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_options_are_deduplicated_and_unknown_ignored() {
        let book = book();
        let options = vec![OptionId::new("SILL"), OptionId::new("SILL"), OptionId::new("GHOST")];
        let quote = PriceCalculationService::default()
            .calculate_quote(inputs(&book, &options))
            .unwrap();

        assert_eq!(quote.option_premiums().len(), 1);
        assert_eq!(quote.subtotal().amount(), dec!(1050));
        let entry = &quote.decision_trace()[1];
        assert_eq!(entry.step, PricingStep::OptionPremiums);
        assert!(entry.rule_applied.contains("ignored unknown: GHOST"));
    }

    #[test]
    fn test_draft_book_is_not_found() {
        let mut book = book();
        book.status = PriceBookStatus::Draft;
        let result = PriceCalculationService::default().calculate_quote(inputs(&book, &[]));
        assert!(matches!(result, Err(PricingError::PriceBookNotFound { .. })));
    }

    #[test]
    fn test_negative_ttl_is_rejected() {
        let book = book();
        let mut request = inputs(&book, &[]);
        request.quote_ttl_minutes = -5;
        assert_eq!(
            PriceCalculationService::default().calculate_quote(request),
            Err(PricingError::InvalidTtl(-5))
        );
    }

    #[test]
    fn test_ttl_past_the_date_range_is_rejected() {
        let book = book();
        let mut request = inputs(&book, &[]);
        request.quote_ttl_minutes = i64::MAX / 60_000;
        assert_eq!(
            PriceCalculationService::default().calculate_quote(request),
            Err(PricingError::InvalidTtl(i64::MAX / 60_000))
        );
    }
}
