//! Domain events for quotes
//!
//! Events are emitted only when a quote is freshly computed. A cache hit
//! returns a quote that was already announced.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, Money, ProductTemplateId, QuoteId};
use crate::quote::Quote;

/// Events emitted by the quote engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteEvent {
    /// A new quote was calculated
    QuoteCalculated {
        quote_id: QuoteId,
        product_template_id: ProductTemplateId,
        price_book_version: u32,
        currency: Currency,
        total: Money,
        valid_until: DateTime<Utc>,
        timestamp: DateTime<Utc>,
    },
}

impl QuoteEvent {
    /// The calculated event for a freshly built quote
    pub fn calculated(quote: &Quote) -> Self {
        QuoteEvent::QuoteCalculated {
            quote_id: quote.quote_id(),
            product_template_id: quote.product_template_id().clone(),
            price_book_version: quote.price_book_version(),
            currency: quote.currency(),
            total: quote.total(),
            valid_until: quote.valid_until(),
            timestamp: quote.created_at(),
        }
    }

    pub fn quote_id(&self) -> QuoteId {
        match self {
            QuoteEvent::QuoteCalculated { quote_id, .. } => *quote_id,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            QuoteEvent::QuoteCalculated { timestamp, .. } => *timestamp,
        }
    }

    /// Returns the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            QuoteEvent::QuoteCalculated { .. } => "QuoteCalculated",
        }
    }
}
