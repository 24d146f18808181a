//! Money types with precise decimal arithmetic
//!
//! This module provides a type-safe representation of monetary values
//! using rust_decimal for precise calculations without floating-point errors.
//!
//! Amounts are held at full precision. Rounding is a pricing concern and is
//! applied explicitly through [`Money::round_with`] at the points the pricing
//! pipeline chooses, never implicitly by arithmetic.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

use crate::rounding::RoundingPolicy;

/// Currency codes following ISO 4217
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    RUB,
    USD,
    EUR,
    GBP,
    JPY,
    CHF,
    KZT,
    BYN,
    PLN,
    CAD,
}

impl Currency {
    /// All supported currencies
    pub const ALL: [Currency; 10] = [
        Currency::RUB,
        Currency::USD,
        Currency::EUR,
        Currency::GBP,
        Currency::JPY,
        Currency::CHF,
        Currency::KZT,
        Currency::BYN,
        Currency::PLN,
        Currency::CAD,
    ];

    /// Returns the number of minor-unit decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Returns the currency symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::RUB => "₽",
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CHF => "CHF",
            Currency::KZT => "₸",
            Currency::BYN => "Br",
            Currency::PLN => "zł",
            Currency::CAD => "C$",
        }
    }

    /// Returns the ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::RUB => "RUB",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CHF => "CHF",
            Currency::KZT => "KZT",
            Currency::BYN => "BYN",
            Currency::PLN => "PLN",
            Currency::CAD => "CAD",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Currency::ALL
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or(MoneyError::UnknownCurrency(code))
    }
}

/// Errors that can occur during money operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        expected: Currency,
        actual: Currency,
    },

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Amount out of range")]
    Overflow,
}

/// A monetary amount with associated currency
///
/// Binary operations between two `Money` values require identical currencies
/// and report [`MoneyError::CurrencyMismatch`] otherwise. There is no implicit
/// conversion and no panicking `+`/`-` operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: Currency,
}

impl Money {
    /// Creates a new Money value at full precision
    pub fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates Money from an integer amount in minor units (e.g., kopecks)
    pub fn from_minor(minor_units: i64, currency: Currency) -> Self {
        Self::new(Decimal::new(minor_units, currency.decimal_places()), currency)
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: dec!(0),
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns the absolute value
    pub fn abs(&self) -> Self {
        Self {
            amount: self.amount.abs(),
            currency: self.currency,
        }
    }

    /// Fails with `CurrencyMismatch` unless `other` shares this currency
    pub fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        self.ensure_currency(other.currency)
    }

    /// Fails with `CurrencyMismatch` unless this value is in `currency`
    pub fn ensure_currency(&self, currency: Currency) -> Result<(), MoneyError> {
        if self.currency != currency {
            return Err(MoneyError::CurrencyMismatch {
                expected: self.currency,
                actual: currency,
            });
        }
        Ok(())
    }

    /// Adds two amounts of the same currency
    pub fn add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Subtracts `other` from this amount; both must share a currency
    pub fn subtract(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Multiplies by a scalar (e.g., an area or a rate)
    pub fn multiply(&self, factor: Decimal) -> Result<Self, MoneyError> {
        let amount = self.amount.checked_mul(factor).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Divides by a scalar
    pub fn divide(&self, divisor: Decimal) -> Result<Self, MoneyError> {
        if divisor.is_zero() {
            return Err(MoneyError::DivisionByZero);
        }
        let amount = self.amount.checked_div(divisor).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(amount, self.currency))
    }

    /// Compares two amounts of the same currency
    pub fn compare(&self, other: &Money) -> Result<Ordering, MoneyError> {
        self.ensure_same_currency(other)?;
        Ok(self.amount.cmp(&other.amount))
    }

    /// Returns true if this amount is strictly greater than `other`
    pub fn is_greater_than(&self, other: &Money) -> Result<bool, MoneyError> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    /// Returns the smaller of two amounts of the same currency
    pub fn min(&self, other: &Money) -> Result<Money, MoneyError> {
        Ok(match self.compare(other)? {
            Ordering::Greater => *other,
            _ => *self,
        })
    }

    /// Returns the larger of two amounts of the same currency
    pub fn max(&self, other: &Money) -> Result<Money, MoneyError> {
        Ok(match self.compare(other)? {
            Ordering::Less => *other,
            _ => *self,
        })
    }

    /// Sums amounts that must all be in `currency`
    pub fn sum<'a, I>(currency: Currency, items: I) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        items
            .into_iter()
            .try_fold(Money::zero(currency), |acc, m| acc.add(m))
    }

    /// Rounds according to a rounding policy (scale plus mode)
    pub fn round_with(&self, policy: &RoundingPolicy) -> Self {
        Self {
            amount: policy.apply(self.amount),
            currency: self.currency,
        }
    }

    /// Rounds half-up to the currency's minor units
    pub fn round_to_currency(&self) -> Self {
        self.round_with(&RoundingPolicy::for_currency(self.currency))
    }

    /// Full-precision rendering used in audit output, e.g. `1050.5 RUB`
    pub fn to_plain_string(&self) -> String {
        format!("{} {}", self.amount.normalize(), self.currency.code())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dp = self.currency.decimal_places();
        write!(
            f,
            "{} {:.dp$}",
            self.currency.symbol(),
            self.amount,
            dp = dp as usize
        )
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.amount, self.currency)
    }
}

/// Represents a percentage rate (e.g., tax rate, discount rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rate {
    /// The rate as a decimal (e.g., 0.05 for 5%)
    value: Decimal,
}

impl Rate {
    /// Creates a rate from a decimal value (e.g., 0.05 for 5%)
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Creates a rate from a percentage (e.g., 5.0 for 5%)
    pub fn from_percentage(percentage: Decimal) -> Self {
        Self {
            value: percentage / dec!(100),
        }
    }

    /// Returns the rate as a percentage
    pub fn as_percentage(&self) -> Decimal {
        self.value * dec!(100)
    }

    /// Applies this rate to a money amount
    pub fn apply(&self, money: &Money) -> Result<Money, MoneyError> {
        money.multiply(self.value)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage().round_dp(4).normalize())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn money_addition_is_associative(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64,
            c in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::RUB);
            let mb = Money::from_minor(b, Currency::RUB);
            let mc = Money::from_minor(c, Currency::RUB);

            let left = ma.add(&mb).unwrap().add(&mc).unwrap();
            let right = ma.add(&mb.add(&mc).unwrap()).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn subtract_inverts_add(
            a in -1_000_000i64..1_000_000i64,
            b in -1_000_000i64..1_000_000i64
        ) {
            let ma = Money::from_minor(a, Currency::EUR);
            let mb = Money::from_minor(b, Currency::EUR);
            prop_assert_eq!(ma.add(&mb).unwrap().subtract(&mb).unwrap().amount(), ma.amount());
        }
    }
}
