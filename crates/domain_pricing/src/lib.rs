//! Pricing Domain
//!
//! This crate turns a window or door configuration into a fully itemized,
//! audited price quote.
//!
//! # Pipeline
//!
//! - **Base price**: area rate from the active price book, with minimum
//!   area and minimum charge floors
//! - **Option premiums**: one premium per selected option
//! - **Discounts**: the best campaign plus an optional promo code, capped
//!   at 30% of the subtotal
//! - **Tax**: regional rate applied to the discounted amount
//! - **Rounding**: a single per-currency rounding of the final total
//!
//! Every stage appends to the quote's decision trace.
//!
//! # Examples
//!
//! ```rust
//! use domain_pricing::{PriceBook, PriceBookStatus, PriceCalculationService, PromoSelection, QuoteInputs, TaxRule};
//! use core_kernel::{Currency, Money, ProductTemplateId};
//! use chrono::Utc;
//! use rust_decimal_macros::dec;
//!
//! let book = PriceBook {
//!     product_template_id: ProductTemplateId::new("WINDOW-PVC-2"),
//!     currency: Currency::RUB,
//!     base_price_per_area: Money::new(dec!(1000), Currency::RUB),
//!     minimum_area: dec!(0),
//!     minimum_charge: None,
//!     option_premiums: Default::default(),
//!     status: PriceBookStatus::Active,
//!     version: 1,
//! };
//! let tax = TaxRule::new("RU-MOW", dec!(20), true);
//!
//! let quote = PriceCalculationService::default()
//!     .calculate_quote(QuoteInputs {
//!         price_book: &book,
//!         selected_option_ids: &[],
//!         width_cm: dec!(100),
//!         height_cm: dec!(100),
//!         currency: Currency::RUB,
//!         campaigns: &[],
//!         promo: PromoSelection::NotRequested,
//!         tax_rule: Some(&tax),
//!         quote_ttl_minutes: 30,
//!         now: Utc::now(),
//!     })
//!     .unwrap();
//!
//! assert_eq!(quote.total().amount(), dec!(1200.00));
//! ```

pub mod adapters;
pub mod calculation;
pub mod campaign;
pub mod discount;
pub mod discount_rule;
pub mod error;
pub mod events;
pub mod ports;
pub mod price_book;
pub mod promo_code;
pub mod quote;
pub mod rounding;
pub mod tax;
pub mod tax_rule;
pub mod trace;

pub use calculation::{PriceCalculationService, QuoteInputs};
pub use campaign::{Campaign, CampaignStatus};
pub use discount::{DiscountOutcome, DiscountService, PromoOutcome, PromoSelection, MAX_DISCOUNT_SHARE};
pub use discount_rule::DiscountRule;
pub use error::{PricingError, PromoRejection};
pub use events::QuoteEvent;
pub use ports::{
    CampaignLookup, LoggingEventPublisher, PriceBookLookup, PromoCodeLookup, QuoteEventPublisher,
    TaxRuleLookup,
};
pub use price_book::{BasePrice, OptionPremium, PriceBook, PriceBookStatus};
pub use promo_code::{normalize_code, PromoCode};
pub use quote::{PremiumLine, Quote};
pub use rounding::{RoundingOutcome, RoundingService};
pub use tax::{TaxCalculationService, TaxOutcome};
pub use tax_rule::TaxRule;
pub use trace::{DecisionTrace, PricingStep, TraceEntry};
