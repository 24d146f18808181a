//! Quotes
//!
//! A quote is the immutable result of one successful calculation. It is
//! built once by the calculation service and afterwards only read: there
//! are no setters, and a cached quote is served exactly as it was built.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, OptionId, ProductTemplateId, QuoteId};
use crate::trace::TraceEntry;

/// One selected option contributing to the price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumLine {
    pub option_id: OptionId,
    pub option_name: String,
    pub amount: Money,
}

/// Fully computed price for one configuration request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    quote_id: QuoteId,
    product_template_id: ProductTemplateId,
    price_book_version: u32,
    currency: Currency,
    base_price: Money,
    option_premiums: Vec<PremiumLine>,
    /// Base price plus option premiums, before discounts
    subtotal: Money,
    discount: Money,
    /// Subtotal minus discount, the amount tax is computed on
    taxable_base: Money,
    tax: Money,
    /// Rounded grand total
    total: Money,
    created_at: DateTime<Utc>,
    valid_until: DateTime<Utc>,
    decision_trace: Vec<TraceEntry>,
}

/// Amounts produced by the pipeline, in pipeline order
#[derive(Debug, Clone)]
pub(crate) struct QuoteAmounts {
    pub base_price: Money,
    pub option_premiums: Vec<PremiumLine>,
    pub subtotal: Money,
    pub discount: Money,
    pub taxable_base: Money,
    pub tax: Money,
    pub total: Money,
}

impl Quote {
    pub(crate) fn new(
        product_template_id: ProductTemplateId,
        price_book_version: u32,
        currency: Currency,
        amounts: QuoteAmounts,
        created_at: DateTime<Utc>,
        valid_until: DateTime<Utc>,
        decision_trace: Vec<TraceEntry>,
    ) -> Self {
        Self {
            quote_id: QuoteId::new_v7(),
            product_template_id,
            price_book_version,
            currency,
            base_price: amounts.base_price,
            option_premiums: amounts.option_premiums,
            subtotal: amounts.subtotal,
            discount: amounts.discount,
            taxable_base: amounts.taxable_base,
            tax: amounts.tax,
            total: amounts.total,
            created_at,
            valid_until,
            decision_trace,
        }
    }

    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    pub fn product_template_id(&self) -> &ProductTemplateId {
        &self.product_template_id
    }

    pub fn price_book_version(&self) -> u32 {
        self.price_book_version
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn base_price(&self) -> Money {
        self.base_price
    }

    pub fn option_premiums(&self) -> &[PremiumLine] {
        &self.option_premiums
    }

    pub fn subtotal(&self) -> Money {
        self.subtotal
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn taxable_base(&self) -> Money {
        self.taxable_base
    }

    pub fn tax(&self) -> Money {
        self.tax
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }

    pub fn decision_trace(&self) -> &[TraceEntry] {
        &self.decision_trace
    }

    /// Returns true while the quote may still be honoured
    pub fn is_valid_at(&self, instant: DateTime<Utc>) -> bool {
        instant < self.valid_until
    }
}
