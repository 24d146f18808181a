//! Pricing Domain Ports
//!
//! Read-only lookups for the reference data a calculation needs, and the
//! outbound port for quote events. The quote service receives these as
//! trait objects; adapters decide where the data lives.
//!
//! ```rust,ignore
//! let book = price_books.find_active(&product).await?
//!     .ok_or(PricingError::PriceBookNotFound { product })?;
//! ```
//!
//! Lookups return `Ok(None)` for data that does not exist. `Err` is kept for
//! failures of the backing system itself.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError, ProductTemplateId, RegionCode};

use crate::campaign::Campaign;
use crate::events::QuoteEvent;
use crate::price_book::PriceBook;
use crate::promo_code::PromoCode;
use crate::tax_rule::TaxRule;

/// Source of price books
#[async_trait]
pub trait PriceBookLookup: DomainPort {
    /// The active price book for a product template, if one exists
    async fn find_active(&self, product: &ProductTemplateId) -> Result<Option<PriceBook>, PortError>;
}

/// Source of campaigns
#[async_trait]
pub trait CampaignLookup: DomainPort {
    /// Campaigns that may apply to a product
    ///
    /// Implementations may over-select; the discount service re-checks
    /// status, validity and product applicability.
    async fn find_for_product(&self, product: &ProductTemplateId) -> Result<Vec<Campaign>, PortError>;
}

/// Source of promo codes
#[async_trait]
pub trait PromoCodeLookup: DomainPort {
    /// The promo code with the given normalized value
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, PortError>;
}

/// Source of tax rules
#[async_trait]
pub trait TaxRuleLookup: DomainPort {
    async fn find_for_region(&self, region: &RegionCode) -> Result<Option<TaxRule>, PortError>;
}

/// Outbound port for quote events
#[async_trait]
pub trait QuoteEventPublisher: DomainPort {
    async fn publish(&self, event: QuoteEvent) -> Result<(), PortError>;
}

/// Publisher that only writes events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventPublisher;

impl DomainPort for LoggingEventPublisher {}

#[async_trait]
impl QuoteEventPublisher for LoggingEventPublisher {
    async fn publish(&self, event: QuoteEvent) -> Result<(), PortError> {
        tracing::info!(
            event_type = event.event_type(),
            quote_id = %event.quote_id(),
            "quote event"
        );
        Ok(())
    }
}
