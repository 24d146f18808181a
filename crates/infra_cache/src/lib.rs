//! Quote Cache Infrastructure
//!
//! This crate keeps fully computed quotes so that repeated identical
//! requests are answered without recomputation.
//!
//! # Keys
//!
//! Entries are keyed by a [`Fingerprint`]: a SHA-256 digest over every input
//! that can change a price, including the price book version. Publishing a
//! new price book version therefore invalidates older entries implicitly.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_cache::{Fingerprint, FingerprintInput, InMemoryQuoteCache, QuoteCache};
//!
//! let cache = InMemoryQuoteCache::new(clock);
//! let key = Fingerprint::of(&input);
//! if let Some(quote) = cache.get(&key).await? {
//!     return Ok(quote);
//! }
//! ```

pub mod cache;
pub mod fingerprint;

pub use cache::{InMemoryQuoteCache, QuoteCache};
pub use fingerprint::{Fingerprint, FingerprintInput};
