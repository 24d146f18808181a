//! Quote cache port and in-process adapter
//!
//! A hit returns the stored quote exactly as it was built. Expired entries
//! are dropped lazily on read and in bulk by `purge_expired`.
//!
//! Concurrent misses on the same fingerprint may both compute and both
//! write; the last write wins. Results are deterministic, so this only
//! costs duplicate work.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{temporal, Clock, DomainPort, PortError, ProductTemplateId};
use domain_pricing::Quote;

use crate::fingerprint::Fingerprint;

/// Storage for computed quotes
#[async_trait]
pub trait QuoteCache: DomainPort {
    /// The quote stored under `fingerprint`, unless missing or expired
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Quote>, PortError>;

    /// Stores a quote for `ttl_minutes`
    async fn put(&self, fingerprint: Fingerprint, quote: Quote, ttl_minutes: i64) -> Result<(), PortError>;

    /// Removes every entry for a product, returning how many were removed
    async fn evict_by_product(&self, product: &ProductTemplateId) -> Result<usize, PortError>;
}

#[derive(Debug, Clone)]
struct CacheEntry {
    quote: Quote,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Lock-protected in-process cache
pub struct InMemoryQuoteCache {
    entries: Arc<RwLock<HashMap<Fingerprint, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryQuoteCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Number of stored entries, including expired ones not yet purged
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let purged = before - entries.len();
        if purged > 0 {
            tracing::debug!(purged, "expired quotes purged");
        }
        purged
    }
}

impl std::fmt::Debug for InMemoryQuoteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryQuoteCache").finish_non_exhaustive()
    }
}

impl DomainPort for InMemoryQuoteCache {}

#[async_trait]
impl QuoteCache for InMemoryQuoteCache {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<Quote>, PortError> {
        let now = self.clock.now();
        {
            let entries = self.entries.read().await;
            match entries.get(fingerprint) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.quote.clone())),
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock, a fresh put may have landed
        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.get(fingerprint) {
            if entry.is_live(now) {
                return Ok(Some(entry.quote.clone()));
            }
            entries.remove(fingerprint);
            tracing::debug!(%fingerprint, "cached quote expired");
        }
        Ok(None)
    }

    async fn put(&self, fingerprint: Fingerprint, quote: Quote, ttl_minutes: i64) -> Result<(), PortError> {
        let expires_at = temporal::expires_after(self.clock.now(), ttl_minutes)
            .map_err(|e| PortError::internal(e.to_string()))?;
        self.entries
            .write()
            .await
            .insert(fingerprint, CacheEntry { quote, expires_at });
        Ok(())
    }

    async fn evict_by_product(&self, product: &ProductTemplateId) -> Result<usize, PortError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.quote.product_template_id() != product);
        let evicted = before - entries.len();
        tracing::info!(%product, evicted, "quotes evicted for product");
        Ok(evicted)
    }
}
