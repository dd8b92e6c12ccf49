//! # Price Value Object
//!
//! Non-negative decimal amount quoted by a carrier.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::value_objects::Price;
//!
//! let price = Price::new(12.5).unwrap();
//! assert!(price < Price::new(13.0).unwrap());
//! assert!(Price::new(-1.0).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative monetary amount.
///
/// Prices carry no currency; a [`RateQuote`](crate::domain::entities::RateQuote)
/// pairs the amount with its currency code.
///
/// # Invariants
///
/// - Never negative
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a price from a floating point value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the value is negative, NaN or
    /// infinite.
    pub fn new(value: f64) -> DomainResult<Self> {
        let decimal = Decimal::from_f64(value).ok_or_else(|| {
            DomainError::InvalidPrice(format!("{value} is not a finite amount"))
        })?;
        Self::from_decimal(decimal)
    }

    /// Creates a price from a decimal value.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the value is negative.
    pub fn from_decimal(value: Decimal) -> DomainResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::InvalidPrice(format!(
                "{value} must not be negative"
            )));
        }
        Ok(Self(value.normalize()))
    }

    /// Creates a price from an amount in minor units (e.g. cents).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` if the amount is negative.
    pub fn from_minor_units(amount: i64) -> DomainResult<Self> {
        Self::from_decimal(Decimal::new(amount, 2))
    }

    /// Returns the underlying decimal value.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Decimal {
        self.0
    }

    /// Returns true if the price is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Price {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())
            .map_err(|e| DomainError::InvalidPrice(format!("'{s}': {e}")))?;
        Self::from_decimal(decimal)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = DomainError;

    fn try_from(value: Decimal) -> DomainResult<Self> {
        Self::from_decimal(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative() {
        assert!(Price::new(-0.01).is_err());
        assert!(Price::from_decimal(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn accepts_zero() {
        assert!(Price::new(0.0).unwrap().is_zero());
    }

    #[test]
    fn rejects_non_finite() {
        assert!(Price::new(f64::NAN).is_err());
        assert!(Price::new(f64::INFINITY).is_err());
    }

    #[test]
    fn minor_units() {
        assert_eq!(Price::from_minor_units(1299).unwrap(), "12.99".parse().unwrap());
    }

    #[test]
    fn parse_and_display() {
        let price: Price = " 8.5 ".parse().unwrap();
        assert_eq!(price.to_string(), "8.50");
        assert!("abc".parse::<Price>().is_err());
    }

    #[test]
    fn ordering_ignores_scale() {
        let a: Price = "10.0".parse().unwrap();
        let b: Price = "10".parse().unwrap();
        assert_eq!(a, b);
        assert!(a < "10.01".parse().unwrap());
    }
}
