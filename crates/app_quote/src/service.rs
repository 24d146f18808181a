//! Quote application service
//!
//! The service is the exposed port of the engine. For `calculate_quote` it:
//!
//! 1. loads the active price book (its version is part of the cache key),
//! 2. checks the cache and returns a hit unmodified,
//! 3. loads the tax rule, campaigns and promo code,
//! 4. runs the calculation pipeline,
//! 5. stores the quote and publishes a `QuoteCalculated` event.
//!
//! Any failure aborts the request; no partial quote is stored or returned.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use core_kernel::{Clock, Currency, Money, OptionId, ProductTemplateId, RegionCode};
use domain_pricing::{
    normalize_code, CampaignLookup, DiscountService, PriceBookLookup, PriceCalculationService,
    PricingError, PromoCode, PromoCodeLookup, PromoRejection, PromoSelection, Quote, QuoteEvent,
    QuoteEventPublisher, QuoteInputs, TaxRuleLookup,
};
use infra_cache::{Fingerprint, FingerprintInput, QuoteCache};

use crate::config::EngineConfig;
use crate::error::QuoteError;

/// A configuration to price
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub product_template_id: ProductTemplateId,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    #[serde(default)]
    pub selected_option_ids: Vec<OptionId>,
    pub currency: Currency,
    #[serde(default)]
    pub promo_code: Option<String>,
    pub region: RegionCode,
}

impl QuoteRequest {
    /// The promo code, normalized, or None when absent or blank
    pub fn normalized_promo_code(&self) -> Option<String> {
        self.promo_code
            .as_deref()
            .map(normalize_code)
            .filter(|code| !code.is_empty())
    }

    fn fingerprint(&self, price_book_version: u32) -> Fingerprint {
        Fingerprint::of(&FingerprintInput {
            product_template_id: &self.product_template_id,
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            selected_option_ids: &self.selected_option_ids,
            currency: self.currency,
            promo_code: self.promo_code.as_deref(),
            region: &self.region,
            price_book_version,
        })
    }
}

/// Outcome of a promo code check
///
/// An unusable code is a normal answer (`valid = false`), not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromoCodeValidation {
    pub code: String,
    pub valid: bool,
    /// Discount the code would grant, capped like a real quote
    pub discount_amount: Option<Money>,
    /// Machine code of the rejection, e.g. `PROMO_EXPIRED`
    pub error_code: Option<String>,
    /// Human-readable rejection reason, e.g. "below minimum subtotal"
    pub reason: Option<String>,
}

impl PromoCodeValidation {
    fn accepted(code: String, discount: Money) -> Self {
        Self {
            code,
            valid: true,
            discount_amount: Some(discount),
            error_code: None,
            reason: None,
        }
    }

    fn rejected(code: String, rejection: PromoRejection) -> Self {
        Self {
            code,
            valid: false,
            discount_amount: None,
            error_code: Some(rejection.code().to_string()),
            reason: Some(rejection.description().to_string()),
        }
    }

    /// The rejection reason as a typed value
    pub fn rejection(&self) -> Option<PromoRejection> {
        [
            PromoRejection::NotFound,
            PromoRejection::Expired,
            PromoRejection::Exhausted,
            PromoRejection::BelowMinimum,
        ]
        .into_iter()
        .find(|r| self.error_code.as_deref() == Some(r.code()))
    }
}

/// The four read ports for reference data
#[derive(Clone)]
pub struct ReferenceData {
    pub price_books: Arc<dyn PriceBookLookup>,
    pub campaigns: Arc<dyn CampaignLookup>,
    pub promo_codes: Arc<dyn PromoCodeLookup>,
    pub tax_rules: Arc<dyn TaxRuleLookup>,
}

impl ReferenceData {
    /// Uses one adapter for all four lookups
    pub fn from_adapter<T>(adapter: Arc<T>) -> Self
    where
        T: PriceBookLookup + CampaignLookup + PromoCodeLookup + TaxRuleLookup,
    {
        Self {
            price_books: adapter.clone(),
            campaigns: adapter.clone(),
            promo_codes: adapter.clone(),
            tax_rules: adapter,
        }
    }
}

/// Cache-fronted quote calculation
pub struct QuoteService {
    reference: ReferenceData,
    cache: Arc<dyn QuoteCache>,
    events: Arc<dyn QuoteEventPublisher>,
    clock: Arc<dyn Clock>,
    calculator: PriceCalculationService,
    quote_ttl_minutes: i64,
}

impl QuoteService {
    /// Creates the service
    ///
    /// # Errors
    ///
    /// Returns a config error if the rounding table names an unknown currency.
    pub fn new(
        reference: ReferenceData,
        cache: Arc<dyn QuoteCache>,
        events: Arc<dyn QuoteEventPublisher>,
        clock: Arc<dyn Clock>,
        config: &EngineConfig,
    ) -> Result<Self, config::ConfigError> {
        let calculator = PriceCalculationService::new(config.rounding.rounding_service()?)
            .with_strict_promo_codes(config.strict_promo_codes);
        Ok(Self {
            reference,
            cache,
            events,
            clock,
            calculator,
            quote_ttl_minutes: config.quote_ttl_minutes,
        })
    }

    /// Prices a configuration, serving identical requests from the cache
    ///
    /// # Errors
    ///
    /// - `PriceBookNotFound` when the product has no active price book
    /// - `TaxRuleNotFound` when the region has no tax rule
    /// - `CurrencyMismatch` when request and reference data disagree
    /// - `InvalidPromoCode` for a rejected code in strict mode
    /// - `Port` / `Cache` when a backing system fails
    #[instrument(
        skip(self, request),
        fields(product = %request.product_template_id, region = %request.region, currency = %request.currency)
    )]
    pub async fn calculate_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let now = self.clock.now();

        let price_book = self
            .reference
            .price_books
            .find_active(&request.product_template_id)
            .await?
            .filter(|book| book.is_active())
            .ok_or_else(|| PricingError::PriceBookNotFound {
                product: request.product_template_id.clone(),
            })?;

        let fingerprint = request.fingerprint(price_book.version);
        if let Some(cached) = self.cache.get(&fingerprint).await.map_err(QuoteError::Cache)? {
            debug!(%fingerprint, quote_id = %cached.quote_id(), "quote cache hit");
            return Ok(cached);
        }
        debug!(%fingerprint, "quote cache miss");

        let tax_rule = self
            .reference
            .tax_rules
            .find_for_region(&request.region)
            .await?
            .ok_or_else(|| PricingError::TaxRuleNotFound {
                region: request.region.clone(),
            })?;

        let campaigns = self
            .reference
            .campaigns
            .find_for_product(&request.product_template_id)
            .await?;

        let promo_code = request.normalized_promo_code();
        let promo = match &promo_code {
            Some(code) => self.reference.promo_codes.find_by_code(code).await?,
            None => None,
        };
        let selection = match (&promo_code, &promo) {
            (None, _) => PromoSelection::NotRequested,
            (Some(_), Some(found)) => PromoSelection::Found(found),
            (Some(code), None) => PromoSelection::NotFound { code: code.as_str() },
        };

        let quote = self.calculator.calculate_quote(QuoteInputs {
            price_book: &price_book,
            selected_option_ids: &request.selected_option_ids,
            width_cm: request.width_cm,
            height_cm: request.height_cm,
            currency: request.currency,
            campaigns: &campaigns,
            promo: selection,
            tax_rule: Some(&tax_rule),
            quote_ttl_minutes: self.quote_ttl_minutes,
            now,
        })?;

        self.cache
            .put(fingerprint, quote.clone(), self.quote_ttl_minutes)
            .await
            .map_err(QuoteError::Cache)?;

        if let Err(e) = self.events.publish(QuoteEvent::calculated(&quote)).await {
            warn!(error = %e, quote_id = %quote.quote_id(), "failed to publish quote event");
        }

        info!(
            quote_id = %quote.quote_id(),
            total = %quote.total(),
            price_book_version = quote.price_book_version(),
            "quote calculated"
        );
        Ok(quote)
    }

    /// Checks whether a promo code would apply to `subtotal`
    ///
    /// # Errors
    ///
    /// Only lookup failures and inconsistent reference data are errors; an
    /// unusable code yields `valid = false` with a reason.
    #[instrument(skip(self))]
    pub async fn validate_promo_code(
        &self,
        code: &str,
        subtotal: Decimal,
        currency: Currency,
    ) -> Result<PromoCodeValidation, QuoteError> {
        let normalized = normalize_code(code);
        let subtotal = Money::new(subtotal, currency);

        let promo: Option<PromoCode> = if normalized.is_empty() {
            None
        } else {
            self.reference.promo_codes.find_by_code(&normalized).await?
        };

        let validation = match promo {
            None => PromoCodeValidation::rejected(normalized, PromoRejection::NotFound),
            Some(promo) => match promo.rejection(&subtotal, self.clock.now())? {
                Some(rejection) => PromoCodeValidation::rejected(normalized, rejection),
                None => {
                    let discount = promo
                        .discount_for(&subtotal)?
                        .min(&DiscountService::discount_cap(&subtotal)?)
                        .map_err(PricingError::from)?;
                    PromoCodeValidation::accepted(normalized, discount)
                }
            },
        };

        debug!(valid = validation.valid, error_code = ?validation.error_code, "promo code validated");
        Ok(validation)
    }

    /// Drops cached quotes for a product after its price book is republished
    #[instrument(skip(self))]
    pub async fn evict_product(&self, product: &ProductTemplateId) -> Result<usize, QuoteError> {
        self.cache
            .evict_by_product(product)
            .await
            .map_err(QuoteError::Cache)
    }
}
