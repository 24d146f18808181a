//! In-memory adapters
//!
//! Used by the command-line front end and by tests. Reference data can be
//! replaced at runtime, which is how price book version bumps are exercised.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, PortError, ProductTemplateId, RegionCode};

use crate::campaign::Campaign;
use crate::events::QuoteEvent;
use crate::ports::{CampaignLookup, PriceBookLookup, PromoCodeLookup, QuoteEventPublisher, TaxRuleLookup};
use crate::price_book::PriceBook;
use crate::promo_code::{normalize_code, PromoCode};
use crate::tax_rule::TaxRule;

/// Serializable snapshot of all reference data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDataSet {
    #[serde(default)]
    pub price_books: Vec<PriceBook>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
    #[serde(default)]
    pub promo_codes: Vec<PromoCode>,
    #[serde(default)]
    pub tax_rules: Vec<TaxRule>,
}

/// Reference data held in memory behind async locks
#[derive(Debug, Default)]
pub struct InMemoryReferenceData {
    price_books: Arc<RwLock<HashMap<ProductTemplateId, Vec<PriceBook>>>>,
    campaigns: Arc<RwLock<Vec<Campaign>>>,
    promo_codes: Arc<RwLock<HashMap<String, PromoCode>>>,
    tax_rules: Arc<RwLock<HashMap<RegionCode, TaxRule>>>,
}

impl InMemoryReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the store from a data set without awaiting any lock
    pub fn from_data_set(data: ReferenceDataSet) -> Self {
        let mut price_books: HashMap<ProductTemplateId, Vec<PriceBook>> = HashMap::new();
        for book in data.price_books {
            price_books
                .entry(book.product_template_id.clone())
                .or_default()
                .push(book);
        }

        let promo_codes = data
            .promo_codes
            .into_iter()
            .map(|p| (p.normalized_code(), p))
            .collect();

        let tax_rules = data
            .tax_rules
            .into_iter()
            .map(|r| (r.region.clone(), r))
            .collect();

        Self {
            price_books: Arc::new(RwLock::new(price_books)),
            campaigns: Arc::new(RwLock::new(data.campaigns)),
            promo_codes: Arc::new(RwLock::new(promo_codes)),
            tax_rules: Arc::new(RwLock::new(tax_rules)),
        }
    }

    /// Adds a price book, replacing any book with the same product and version
    pub async fn upsert_price_book(&self, book: PriceBook) {
        let mut books = self.price_books.write().await;
        let entry = books.entry(book.product_template_id.clone()).or_default();
        entry.retain(|b| b.version != book.version);
        entry.push(book);
    }

    pub async fn add_campaign(&self, campaign: Campaign) {
        self.campaigns.write().await.push(campaign);
    }

    pub async fn upsert_promo_code(&self, promo: PromoCode) {
        self.promo_codes
            .write()
            .await
            .insert(promo.normalized_code(), promo);
    }

    pub async fn upsert_tax_rule(&self, rule: TaxRule) {
        self.tax_rules.write().await.insert(rule.region.clone(), rule);
    }
}

impl DomainPort for InMemoryReferenceData {}

#[async_trait]
impl PriceBookLookup for InMemoryReferenceData {
    async fn find_active(&self, product: &ProductTemplateId) -> Result<Option<PriceBook>, PortError> {
        let books = self.price_books.read().await;
        Ok(books.get(product).and_then(|versions| {
            versions
                .iter()
                .filter(|b| b.is_active())
                .max_by_key(|b| b.version)
                .cloned()
        }))
    }
}

#[async_trait]
impl CampaignLookup for InMemoryReferenceData {
    async fn find_for_product(&self, product: &ProductTemplateId) -> Result<Vec<Campaign>, PortError> {
        let campaigns = self.campaigns.read().await;
        Ok(campaigns
            .iter()
            .filter(|c| c.applies_to(product))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PromoCodeLookup for InMemoryReferenceData {
    async fn find_by_code(&self, code: &str) -> Result<Option<PromoCode>, PortError> {
        Ok(self
            .promo_codes
            .read()
            .await
            .get(&normalize_code(code))
            .cloned())
    }
}

#[async_trait]
impl TaxRuleLookup for InMemoryReferenceData {
    async fn find_for_region(&self, region: &RegionCode) -> Result<Option<TaxRule>, PortError> {
        Ok(self.tax_rules.read().await.get(region).cloned())
    }
}

/// Publisher that keeps every event it receives
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    events: Arc<RwLock<Vec<QuoteEvent>>>,
    failing: AtomicBool,
}

impl RecordingEventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent publish fail with a connection error
    pub fn fail_publishes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn events(&self) -> Vec<QuoteEvent> {
        self.events.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }
}

impl DomainPort for RecordingEventPublisher {}

#[async_trait]
impl QuoteEventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: QuoteEvent) -> Result<(), PortError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::connection("event bus unreachable"));
        }
        self.events.write().await.push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discount_rule::DiscountRule;
    use crate::price_book::PriceBookStatus;
    use core_kernel::{Currency, Money, ValidityWindow};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn book(version: u32, status: PriceBookStatus) -> PriceBook {
        PriceBook {
            product_template_id: ProductTemplateId::new("DOOR-OAK"),
            currency: Currency::RUB,
            base_price_per_area: Money::new(dec!(5000), Currency::RUB),
            minimum_area: dec!(0),
            minimum_charge: None,
            option_premiums: BTreeMap::new(),
            status,
            version,
        }
    }

    #[tokio::test]
    async fn test_find_active_picks_latest_active_version() {
        let data = InMemoryReferenceData::from_data_set(ReferenceDataSet {
            price_books: vec![
                book(1, PriceBookStatus::Active),
                book(2, PriceBookStatus::Active),
                book(3, PriceBookStatus::Draft),
            ],
            ..Default::default()
        });

        let found = data
            .find_active(&ProductTemplateId::new("DOOR-OAK"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.version, 2);
        assert!(data
            .find_active(&ProductTemplateId::new("UNKNOWN"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_promo_lookup_is_normalized() {
        let data = InMemoryReferenceData::new();
        data.upsert_promo_code(PromoCode {
            code: "Summer10".to_string(),
            discount: DiscountRule::percentage(dec!(10)),
            min_subtotal: None,
            usage_limit: None,
            usage_count: 0,
            validity: ValidityWindow::unbounded(),
        })
        .await;

        assert!(data.find_by_code("  summer10").await.unwrap().is_some());
        assert!(data.find_by_code("WINTER").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failing_publisher() {
        let publisher = RecordingEventPublisher::new();
        publisher.fail_publishes(true);
        let event = QuoteEvent::QuoteCalculated {
            quote_id: core_kernel::QuoteId::new(),
            product_template_id: ProductTemplateId::new("DOOR-OAK"),
            price_book_version: 1,
            currency: Currency::RUB,
            total: Money::zero(Currency::RUB),
            valid_until: chrono::Utc::now(),
            timestamp: chrono::Utc::now(),
        };

        assert!(publisher.publish(event).await.unwrap_err().is_transient());
        assert_eq!(publisher.len().await, 0);
    }
}
