//! Quote Application Service
//!
//! Wires the pricing domain to its ports: reference data lookups, the quote
//! cache, the event publisher and the clock. This is the surface callers use.
//!
//! ```rust,ignore
//! let reference = Arc::new(InMemoryReferenceData::from_data_set(data));
//! let service = QuoteService::new(
//!     ReferenceData::from_adapter(reference),
//!     Arc::new(InMemoryQuoteCache::new(clock.clone())),
//!     Arc::new(LoggingEventPublisher),
//!     clock,
//!     &EngineConfig::default(),
//! )?;
//! let quote = service.calculate_quote(&request).await?;
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::{EngineConfig, LogFormat, RoundingConfig, MAX_QUOTE_TTL_MINUTES};
pub use error::QuoteError;
pub use service::{PromoCodeValidation, QuoteRequest, QuoteService, ReferenceData};
