//! Adapters for the pricing ports
//!
//! # Available Adapters
//!
//! - **InMemoryReferenceData**: price books, campaigns, promo codes and tax
//!   rules held in memory, loadable from a JSON data set
//! - **RecordingEventPublisher**: keeps published events for inspection
//!
//! ```rust,ignore
//! use domain_pricing::adapters::{InMemoryReferenceData, ReferenceDataSet};
//! use std::sync::Arc;
//!
//! let data: ReferenceDataSet = serde_json::from_str(&json)?;
//! let reference = Arc::new(InMemoryReferenceData::from_data_set(data));
//! ```

pub mod memory;

pub use memory::{InMemoryReferenceData, RecordingEventPublisher, ReferenceDataSet};
