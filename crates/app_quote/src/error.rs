//! Application errors

use thiserror::Error;

use core_kernel::PortError;
use domain_pricing::{PricingError, PromoRejection};

/// Errors returned by the quote service
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Deterministic failure derived from the request and reference data
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A reference data lookup failed
    #[error("Reference data lookup failed: {0}")]
    Port(#[from] PortError),

    /// The quote cache failed
    #[error("Quote cache failed: {0}")]
    Cache(#[source] PortError),
}

impl QuoteError {
    /// Returns true if retrying the request may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            QuoteError::Pricing(_) => false,
            QuoteError::Port(e) | QuoteError::Cache(e) => e.is_transient(),
        }
    }

    /// Stable machine-readable code for the error
    pub fn code(&self) -> &'static str {
        match self {
            QuoteError::Pricing(e) => match e {
                PricingError::PriceBookNotFound { .. } => "PRICE_BOOK_NOT_FOUND",
                PricingError::TaxRuleNotFound { .. } => "TAX_RULE_NOT_FOUND",
                PricingError::CurrencyMismatch { .. } => "CURRENCY_MISMATCH",
                PricingError::InvalidPromoCode { reason, .. } => reason.code(),
                PricingError::InvalidDimensions { .. } => "INVALID_DIMENSIONS",
                PricingError::InvalidTtl(_) => "INVALID_TTL",
                PricingError::InvalidReferenceData(_) => "INVALID_REFERENCE_DATA",
            },
            QuoteError::Port(_) => "REFERENCE_DATA_UNAVAILABLE",
            QuoteError::Cache(_) => "CACHE_UNAVAILABLE",
        }
    }

    /// The promo rejection carried by an `InvalidPromoCode` error
    pub fn promo_rejection(&self) -> Option<PromoRejection> {
        match self {
            QuoteError::Pricing(PricingError::InvalidPromoCode { reason, .. }) => Some(*reason),
            _ => None,
        }
    }
}
