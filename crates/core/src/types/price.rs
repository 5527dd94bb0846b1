//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are always in the currency's **major** unit (dollars, not cents).
//! Minor units only cross the boundary through [`Price::from_cents`] and
//! [`Price::to_cents`].

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when building or combining prices.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PriceError {
    /// Catalog prices are never negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// Two prices in different currencies were combined.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        left: CurrencyCode,
        right: CurrencyCode,
    },
    /// A float could not be represented as a decimal.
    #[error("price is not a finite number: {0}")]
    NotFinite(f64),
    /// The result does not fit in a decimal amount.
    #[error("price arithmetic overflowed")]
    Overflow,
    /// Unknown ISO 4217 code.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a catalog price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` if `amount` is below zero.
    pub fn try_new(amount: Decimal, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self::new(amount, currency_code))
    }

    /// Convert a wire-format float (e.g. `19.99`) into a price.
    ///
    /// The value is rounded to the currency's two decimal places.
    ///
    /// # Errors
    ///
    /// Returns an error if the float is NaN/infinite or negative.
    pub fn from_f64(amount: f64, currency_code: CurrencyCode) -> Result<Self, PriceError> {
        let decimal = Decimal::try_from(amount).map_err(|_| PriceError::NotFinite(amount))?;
        Self::try_new(decimal.round_dp(2), currency_code)
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Create a price from an amount in minor units (cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// Amount in minor units (cents), rounded half-even.
    #[must_use]
    pub fn to_cents(&self) -> Option<i64> {
        self.amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round()
            .to_i64()
    }

    /// Price of `quantity` units, or `None` if the amount overflows.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Self::new(amount, self.currency_code))
    }

    /// Price of `quantity` units, capped at the largest decimal amount.
    #[must_use]
    pub fn saturating_times(&self, quantity: u32) -> Self {
        Self::new(
            self.amount.saturating_mul(Decimal::from(quantity)),
            self.currency_code,
        )
    }

    /// Add two prices of the same currency.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::CurrencyMismatch` if the currencies differ and
    /// `PriceError::Overflow` if the sum does not fit.
    pub fn checked_add(&self, other: &Self) -> Result<Self, PriceError> {
        if self.currency_code != other.currency_code {
            return Err(PriceError::CurrencyMismatch {
                left: self.currency_code,
                right: other.currency_code,
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(PriceError::Overflow)?;
        Ok(Self::new(amount, self.currency_code))
    }

    /// Amount as a float for wire formats that expect JSON numbers.
    #[must_use]
    pub fn amount_f64(&self) -> f64 {
        self.amount.to_f64().unwrap_or_default()
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("{}{:.2}", self.currency_code.symbol(), self.amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            other => Err(PriceError::UnknownCurrency(other.to_string())),
        }
    }
}
