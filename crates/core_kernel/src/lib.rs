//! Core Kernel - Foundational types and utilities for the quote engine
//!
//! This crate provides the fundamental building blocks used across all modules:
//! - Money types with precise decimal arithmetic
//! - Rounding policies (scale plus mode)
//! - Validity windows and injectable clocks
//! - Common identifiers and port infrastructure

pub mod money;
pub mod rounding;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError, Rate};
pub use rounding::{RoundingMode, RoundingPolicy};
pub use temporal::{ValidityWindow, Clock, SystemClock, FixedClock, TemporalError};
pub use identifiers::{QuoteId, CampaignId, ProductTemplateId, OptionId, RegionCode};
pub use ports::{PortError, DomainPort};
