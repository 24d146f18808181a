//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! quote engine test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built reference data for the standard pricing scenarios
//! - `builders`: Builder patterns for price books, campaigns and promo codes
//! - `logging`: One-time tracing setup for tests
//! - `assertions`: Custom assertion helpers for money and decision traces
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod logging;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use logging::*;
pub use assertions::*;
pub use generators::*;
