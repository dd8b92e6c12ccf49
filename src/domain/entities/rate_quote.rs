//! # Rate Quote Entity
//!
//! Normalized price offer for a shipment.
//!
//! Every carrier adapter reports rates in its own shape; normalization turns
//! each of them into a [`RateQuote`] so quotes from different carriers can be
//! compared and ordered by price.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::entities::rate_quote::{DeliveryEstimate, RateQuote};
//! use shipping_rates::domain::value_objects::{CarrierId, Price};
//!
//! let quote = RateQuote::builder(CarrierId::ups(), "UPS Ground", Price::new(14.2).unwrap())
//!     .service_code("03")
//!     .delivery(DeliveryEstimate::BusinessDays(3))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(quote.currency(), "USD");
//! assert_eq!(quote.service_code(), Some("03"));
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CarrierId, Price};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency assumed when a carrier does not report one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Estimated delivery for a quoted service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DeliveryEstimate {
    /// Delivery expected on a specific date.
    Date(NaiveDate),
    /// Delivery expected within a date range (inclusive).
    Range {
        /// Earliest expected date.
        earliest: NaiveDate,
        /// Latest expected date.
        latest: NaiveDate,
    },
    /// Delivery expected after this many business days in transit.
    BusinessDays(u32),
}

impl fmt::Display for DeliveryEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{date}"),
            Self::Range { earliest, latest } => write!(f, "{earliest}..{latest}"),
            Self::BusinessDays(1) => write!(f, "1 business day"),
            Self::BusinessDays(days) => write!(f, "{days} business days"),
        }
    }
}

/// A normalized shipping-rate quote.
///
/// # Invariants
///
/// - Service label is non-blank
/// - Currency is a three-letter upper-case code
/// - Price is non-negative (guaranteed by [`Price`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateQuote {
    /// The carrier that offered this rate.
    carrier: CarrierId,
    /// Human-readable service level, e.g. "Ground" or "Priority Mail".
    service: String,
    /// Carrier-specific service code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    service_code: Option<String>,
    /// Total price of the service.
    price: Price,
    /// ISO 4217 currency code of the price.
    currency: String,
    /// Estimated delivery, if the carrier reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    delivery: Option<DeliveryEstimate>,
}

impl RateQuote {
    /// Creates a quote in the default currency.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuote` if the service label is blank.
    pub fn new(carrier: CarrierId, service: impl Into<String>, price: Price) -> DomainResult<Self> {
        Self::builder(carrier, service, price).build()
    }

    /// Returns a builder for constructing a quote.
    #[must_use]
    pub fn builder(carrier: CarrierId, service: impl Into<String>, price: Price) -> RateQuoteBuilder {
        RateQuoteBuilder::new(carrier, service, price)
    }

    fn validate_service(service: &str) -> DomainResult<()> {
        if service.trim().is_empty() {
            return Err(DomainError::InvalidQuote(
                "service label must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    fn normalize_currency(currency: &str) -> DomainResult<String> {
        let code = currency.trim().to_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(DomainError::InvalidQuote(format!(
                "'{currency}' is not a currency code"
            )));
        }
        Ok(code)
    }

    /// Returns the carrier.
    #[inline]
    #[must_use]
    pub fn carrier(&self) -> &CarrierId {
        &self.carrier
    }

    /// Returns the service label.
    #[inline]
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the carrier-specific service code, if any.
    #[inline]
    #[must_use]
    pub fn service_code(&self) -> Option<&str> {
        self.service_code.as_deref()
    }

    /// Returns the price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns the currency code.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Returns the delivery estimate, if any.
    #[inline]
    #[must_use]
    pub fn delivery(&self) -> Option<DeliveryEstimate> {
        self.delivery
    }
}

impl fmt::Display for RateQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RateQuote({} {} @ {} {})",
            self.carrier, self.service, self.price, self.currency
        )?;
        if let Some(delivery) = self.delivery {
            write!(f, " eta={delivery}")?;
        }
        Ok(())
    }
}

/// Builder for [`RateQuote`].
#[derive(Debug, Clone)]
pub struct RateQuoteBuilder {
    carrier: CarrierId,
    service: String,
    price: Price,
    service_code: Option<String>,
    currency: Option<String>,
    delivery: Option<DeliveryEstimate>,
}

impl RateQuoteBuilder {
    /// Creates a new builder with required fields.
    #[must_use]
    pub fn new(carrier: CarrierId, service: impl Into<String>, price: Price) -> Self {
        Self {
            carrier,
            service: service.into(),
            price,
            service_code: None,
            currency: None,
            delivery: None,
        }
    }

    /// Sets the carrier-specific service code.
    #[must_use]
    pub fn service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = Some(code.into());
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the delivery estimate.
    #[must_use]
    pub fn delivery(mut self, delivery: DeliveryEstimate) -> Self {
        self.delivery = Some(delivery);
        self
    }

    /// Sets the delivery estimate if one is given.
    #[must_use]
    pub fn maybe_delivery(mut self, delivery: Option<DeliveryEstimate>) -> Self {
        self.delivery = delivery;
        self
    }

    /// Builds the quote with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuote` if the service label is blank or
    /// the currency is not a three-letter code.
    pub fn build(self) -> DomainResult<RateQuote> {
        RateQuote::validate_service(&self.service)?;
        let currency =
            RateQuote::normalize_currency(self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY))?;

        Ok(RateQuote {
            carrier: self.carrier,
            service: self.service.trim().to_string(),
            service_code: self.service_code,
            price: self.price,
            currency,
            delivery: self.delivery,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn price(value: f64) -> Price {
        Price::new(value).unwrap()
    }

    #[test]
    fn new_uses_default_currency() {
        let quote = RateQuote::new(CarrierId::usps(), "Priority Mail", price(9.35)).unwrap();
        assert_eq!(quote.currency(), DEFAULT_CURRENCY);
        assert!(quote.delivery().is_none());
        assert!(quote.service_code().is_none());
    }

    #[test]
    fn blank_service_rejected() {
        let result = RateQuote::new(CarrierId::ups(), "   ", price(1.0));
        assert!(matches!(result, Err(DomainError::InvalidQuote(_))));
    }

    #[test]
    fn currency_is_normalized() {
        let quote = RateQuote::builder(CarrierId::ups(), "Ground", price(1.0))
            .currency(" cad ")
            .build()
            .unwrap();
        assert_eq!(quote.currency(), "CAD");
    }

    #[test]
    fn invalid_currency_rejected() {
        for currency in ["US", "DOLLARS", "U$D"] {
            let result = RateQuote::builder(CarrierId::ups(), "Ground", price(1.0))
                .currency(currency)
                .build();
            assert!(result.is_err(), "{currency} should be rejected");
        }
    }

    #[test]
    fn service_label_is_trimmed() {
        let quote = RateQuote::new(CarrierId::ups(), " Ground ", price(1.0)).unwrap();
        assert_eq!(quote.service(), "Ground");
    }

    #[test]
    fn display() {
        let quote = RateQuote::builder(CarrierId::ups(), "Ground", price(14.2))
            .delivery(DeliveryEstimate::BusinessDays(3))
            .build()
            .unwrap();
        assert_eq!(
            quote.to_string(),
            "RateQuote(UPS Ground @ 14.20 USD) eta=3 business days"
        );
    }

    #[test]
    fn delivery_estimate_display() {
        let earliest = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let latest = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
        assert_eq!(DeliveryEstimate::Date(earliest).to_string(), "2024-03-04");
        assert_eq!(
            DeliveryEstimate::Range { earliest, latest }.to_string(),
            "2024-03-04..2024-03-06"
        );
        assert_eq!(DeliveryEstimate::BusinessDays(1).to_string(), "1 business day");
    }

    #[test]
    fn serde_skips_absent_options() {
        let quote = RateQuote::new(CarrierId::ups(), "Ground", price(5.0)).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["carrier"], "UPS");
        assert_eq!(json["price"], "5");
        assert!(json.get("delivery").is_none());
    }
}
