//! Type-safe price representation using fixed-point arithmetic.
//!
//! Prices are held as a non-negative integer count of minor units (céntimos
//! for PEN, cents for USD/EUR). Decimal values only appear at the boundaries:
//! parsing user or storage input, and formatting for display. Summing a
//! `0.10` price a thousand times therefore yields exactly `100.00`.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Number of fractional digits carried by every supported currency.
const MINOR_UNIT_SCALE: u32 = 2;

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price is not a number: {0:?}")]
    Invalid(String),
    /// The input is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The input has more fractional digits than the currency supports.
    #[error("price has {scale} decimal places, at most 2 are allowed")]
    TooPrecise {
        /// Number of significant fractional digits found.
        scale: u32,
    },
    /// The input is above [`Price::MAX`].
    #[error("price is out of range")]
    OutOfRange,
}

/// A non-negative monetary amount in minor units.
///
/// ## Examples
///
/// ```
/// use nutrijoseph_core::{CurrencyCode, Price};
///
/// let price = Price::parse("49.90").unwrap();
/// assert_eq!(price.minor_units(), 4990);
/// assert_eq!(price.display(CurrencyCode::PEN), "S/49.90");
///
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("abc").is_err());
/// assert!(Price::parse("0.001").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(u64);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Largest amount accepted by [`Price::parse`]: 9 999 999 999 999.99.
    ///
    /// Fifteen significant digits is the most an `f64` carries exactly, and
    /// persisted carts store prices as JSON numbers.
    pub const MAX: Self = Self(999_999_999_999_999);

    /// Create a price from a count of minor units (e.g. `4990` for 49.90).
    #[must_use]
    pub const fn from_minor_units(minor_units: u64) -> Self {
        Self(minor_units)
    }

    /// Get the amount in minor units.
    #[must_use]
    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a price from a decimal string such as `"49.90"` or `"10"`.
    ///
    /// Surrounding whitespace is ignored. Scientific notation (`"1e2"`) is
    /// accepted because JSON encoders may produce it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a finite decimal number, is
    /// negative, has more than two significant fractional digits, or is above
    /// [`Price::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let trimmed = s.trim();
        let amount = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::from_decimal(amount)
    }

    /// Convert a decimal amount in major units into a price.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, too precise, or above
    /// [`Price::MAX`].
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let normalized = amount.normalize();
        if normalized.scale() > MINOR_UNIT_SCALE {
            return Err(PriceError::TooPrecise {
                scale: normalized.scale(),
            });
        }

        normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor| minor.trunc().to_u64())
            .filter(|minor| *minor <= Self::MAX.0)
            .map(Self)
            .ok_or(PriceError::OutOfRange)
    }

    /// Get the amount as a decimal in major units with two fractional digits.
    #[must_use]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(i128::from(self.0), MINOR_UNIT_SCALE)
    }

    /// Add two prices, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(sum) => Some(Self(sum)),
            None => None,
        }
    }

    /// Subtract, stopping at zero.
    #[must_use]
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Multiply by a quantity, returning `None` on overflow.
    ///
    /// Sums and products may exceed [`Price::MAX`]; only parsed unit prices
    /// are capped.
    #[must_use]
    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(u64::from(quantity)).map(Self)
    }

    /// Sum an iterator of prices, returning `None` on overflow.
    #[must_use]
    pub fn checked_sum(prices: impl IntoIterator<Item = Self>) -> Option<Self> {
        prices
            .into_iter()
            .try_fold(Self::ZERO, Self::checked_add)
    }

    /// Format for display with the currency symbol (e.g. `"S/19.99"`).
    #[must_use]
    pub fn display(&self, currency: CurrencyCode) -> String {
        format!("{}{:.2}", currency.symbol(), self.to_decimal())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_decimal())
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.to_decimal()
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    /// Peruvian sol.
    #[default]
    PEN,
    USD,
    EUR,
}

impl CurrencyCode {
    /// Display symbol placed before the amount.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::PEN => "S/",
            Self::USD => "$",
            Self::EUR => "€",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PEN => "PEN",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unsupported [`CurrencyCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CurrencyError {
    #[error("unsupported currency code: {0}")]
    Unsupported(String),
}

impl FromStr for CurrencyCode {
    type Err = CurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PEN" => Ok(Self::PEN),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            other => Err(CurrencyError::Unsupported(other.to_owned())),
        }
    }
}
