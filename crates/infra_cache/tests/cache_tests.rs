//! Behaviour of the in-memory quote cache under TTL and eviction

use chrono::Duration;
use std::sync::Arc;

use core_kernel::{Currency, FixedClock, OptionId, ProductTemplateId, RegionCode};
use domain_pricing::{PriceCalculationService, PromoSelection, Quote, QuoteInputs};
use infra_cache::{Fingerprint, FingerprintInput, InMemoryQuoteCache, QuoteCache};
use rust_decimal_macros::dec;
use test_utils::{IdFixtures, PriceBookBuilder, StringFixtures, TemporalFixtures};

fn quote_for(product: &str) -> Quote {
    let book = PriceBookBuilder::new().with_product(product).build();
    PriceCalculationService::default()
        .calculate_quote(QuoteInputs {
            price_book: &book,
            selected_option_ids: &[],
            width_cm: dec!(100),
            height_cm: dec!(100),
            currency: Currency::RUB,
            campaigns: &[],
            promo: PromoSelection::NotRequested,
            tax_rule: None,
            quote_ttl_minutes: 30,
            now: TemporalFixtures::now(),
        })
        .unwrap()
}

fn key(product: &ProductTemplateId, version: u32) -> Fingerprint {
    let options = vec![OptionId::new(StringFixtures::sill_option())];
    let region = RegionCode::new(StringFixtures::moscow_region());
    Fingerprint::of(&FingerprintInput {
        product_template_id: product,
        width_cm: dec!(100),
        height_cm: dec!(100),
        selected_option_ids: &options,
        currency: Currency::RUB,
        promo_code: None,
        region: &region,
        price_book_version: version,
    })
}

fn cache() -> (Arc<FixedClock>, InMemoryQuoteCache) {
    let clock = Arc::new(FixedClock::new(TemporalFixtures::now()));
    let cache = InMemoryQuoteCache::new(clock.clone());
    (clock, cache)
}

#[tokio::test]
async fn test_hit_returns_the_stored_quote_unmodified() {
    let (_, cache) = cache();
    let quote = quote_for(StringFixtures::window_product());
    let fp = key(&IdFixtures::window_product(), 1);

    cache.put(fp.clone(), quote.clone(), 30).await.unwrap();
    let hit = cache.get(&fp).await.unwrap().unwrap();

    assert_eq!(hit, quote);
    assert_eq!(hit.quote_id(), quote.quote_id());
}

#[tokio::test]
async fn test_entry_expires_after_ttl() {
    let (clock, cache) = cache();
    let fp = key(&IdFixtures::window_product(), 1);
    cache
        .put(fp.clone(), quote_for(StringFixtures::window_product()), 30)
        .await
        .unwrap();

    clock.advance(Duration::minutes(29));
    assert!(cache.get(&fp).await.unwrap().is_some());

    clock.advance(Duration::minutes(1));
    assert!(cache.get(&fp).await.unwrap().is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn test_zero_ttl_is_never_served() {
    let (_, cache) = cache();
    let fp = key(&IdFixtures::window_product(), 1);
    cache
        .put(fp.clone(), quote_for(StringFixtures::window_product()), 0)
        .await
        .unwrap();
    assert!(cache.get(&fp).await.unwrap().is_none());
}

#[tokio::test]
async fn test_negative_ttl_is_rejected() {
    let (_, cache) = cache();
    let fp = key(&IdFixtures::window_product(), 1);
    let result = cache
        .put(fp, quote_for(StringFixtures::window_product()), -1)
        .await;
    assert!(result.is_err());
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn test_ttl_past_the_date_range_is_rejected() {
    let (_, cache) = cache();
    let fp = key(&IdFixtures::window_product(), 1);
    let result = cache
        .put(fp, quote_for(StringFixtures::window_product()), i64::MAX / 60_000)
        .await;
    assert!(result.is_err());
    assert_eq!(cache.len().await, 0);
}

#[tokio::test]
async fn test_new_price_book_version_misses() {
    let (_, cache) = cache();
    let product = IdFixtures::window_product();
    cache
        .put(key(&product, 1), quote_for(StringFixtures::window_product()), 30)
        .await
        .unwrap();

    assert!(cache.get(&key(&product, 2)).await.unwrap().is_none());
    assert!(cache.get(&key(&product, 1)).await.unwrap().is_some());
}

#[tokio::test]
async fn test_evict_by_product_only_touches_that_product() {
    let (_, cache) = cache();
    let window = IdFixtures::window_product();
    let door = IdFixtures::door_product();
    cache
        .put(key(&window, 1), quote_for(StringFixtures::window_product()), 30)
        .await
        .unwrap();
    cache
        .put(key(&window, 2), quote_for(StringFixtures::window_product()), 30)
        .await
        .unwrap();
    cache
        .put(key(&door, 1), quote_for(StringFixtures::door_product()), 30)
        .await
        .unwrap();

    assert_eq!(cache.evict_by_product(&window).await.unwrap(), 2);
    assert!(cache.get(&key(&window, 1)).await.unwrap().is_none());
    assert!(cache.get(&key(&door, 1)).await.unwrap().is_some());
    assert_eq!(cache.evict_by_product(&window).await.unwrap(), 0);
}

#[tokio::test]
async fn test_purge_expired() {
    let (clock, cache) = cache();
    let window = IdFixtures::window_product();
    cache
        .put(key(&window, 1), quote_for(StringFixtures::window_product()), 5)
        .await
        .unwrap();
    cache
        .put(key(&window, 2), quote_for(StringFixtures::window_product()), 60)
        .await
        .unwrap();

    clock.advance(Duration::minutes(10));
    assert_eq!(cache.purge_expired().await, 1);
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn test_concurrent_puts_last_write_wins() {
    let (_, cache) = cache();
    let cache = Arc::new(cache);
    let fp = key(&IdFixtures::window_product(), 1);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = cache.clone();
        let fp = fp.clone();
        handles.push(tokio::spawn(async move {
            cache
                .put(fp, quote_for(StringFixtures::window_product()), 30)
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(cache.len().await, 1);
    assert!(cache.get(&fp).await.unwrap().is_some());
}
