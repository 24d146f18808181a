//! Request fingerprints
//!
//! A fingerprint is a deterministic digest of
//! `(product, width, height, sorted option ids, currency, promo code, region,
//! price book version)`. Inputs that mean the same thing hash the same:
//! dimensions are compared by value (`100` and `100.0` agree), option ids
//! are de-duplicated and sorted, and promo codes are normalized.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;

use core_kernel::{Currency, OptionId, ProductTemplateId, RegionCode};
use domain_pricing::normalize_code;

/// Inputs that determine a quote
#[derive(Debug, Clone, Copy)]
pub struct FingerprintInput<'a> {
    pub product_template_id: &'a ProductTemplateId,
    pub width_cm: Decimal,
    pub height_cm: Decimal,
    pub selected_option_ids: &'a [OptionId],
    pub currency: Currency,
    pub promo_code: Option<&'a str>,
    pub region: &'a RegionCode,
    pub price_book_version: u32,
}

/// Hex-encoded SHA-256 cache key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of a request
    pub fn of(input: &FingerprintInput<'_>) -> Self {
        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        hash_var(&mut hasher, input.product_template_id.as_str());
        hash_var(&mut hasher, &input.width_cm.normalize().to_string());
        hash_var(&mut hasher, &input.height_cm.normalize().to_string());

        let options: BTreeSet<&str> = input.selected_option_ids.iter().map(|o| o.as_str()).collect();
        hasher.update((options.len() as u32).to_le_bytes());
        for option in options {
            hash_var(&mut hasher, option);
        }

        hash_var(&mut hasher, input.currency.code());

        // An absent code and a blank code are the same request
        let promo = input.promo_code.map(normalize_code).unwrap_or_default();
        hash_var(&mut hasher, &promo);

        hash_var(&mut hasher, input.region.as_str());
        hasher.update(input.price_book_version.to_le_bytes());

        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form is enough to correlate log lines
        write!(f, "{}", &self.0[..self.0.len().min(16)])
    }
}
