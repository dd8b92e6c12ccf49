//! # Carrier Rate Client Trait
//!
//! Port definitions for carrier integrations.
//!
//! This module defines the [`CarrierRateClient`] trait that every carrier
//! integration implements, the [`RawRate`] shape they report, and the
//! [`CarrierRegistry`] capability through which callers select clients.
//!
//! # Examples
//!
//! ```ignore
//! use shipping_rates::infrastructure::carriers::traits::{CarrierRateClient, RawRate};
//! use shipping_rates::infrastructure::carriers::error::CarrierResult;
//!
//! struct MyCarrier { /* ... */ }
//!
//! #[async_trait::async_trait]
//! impl CarrierRateClient for MyCarrier {
//!     // ... implement required methods
//! }
//! ```

use crate::domain::entities::DeliveryEstimate;
use crate::domain::value_objects::{CarrierId, Location, Package};
use crate::infrastructure::carriers::error::CarrierResult;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An amount as reported by a carrier, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawAmount {
    /// Amount in major units, e.g. dollars.
    Decimal(Decimal),
    /// Amount in minor units, e.g. cents.
    MinorUnits(i64),
    /// Amount as text, e.g. `"14.20"`.
    Text(String),
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(value) => write!(f, "{value}"),
            Self::MinorUnits(value) => write!(f, "{value} minor units"),
            Self::Text(value) => write!(f, "'{value}'"),
        }
    }
}

/// One rate entry as reported by a carrier.
///
/// Every entry is convertible into a
/// [`RateQuote`](crate::domain::entities::RateQuote) by the normalization
/// service; entries that cannot be converted make the whole response
/// malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRate {
    /// Human-readable service name.
    pub service_name: String,
    /// Carrier-specific service code.
    pub service_code: Option<String>,
    /// Total charge for the service.
    pub total_price: RawAmount,
    /// Currency code, if the carrier reported one.
    pub currency: Option<String>,
    /// Delivery estimate, if the carrier reported one.
    pub delivery: Option<DeliveryEstimate>,
}

impl RawRate {
    /// Creates a raw rate with a service name and amount.
    #[must_use]
    pub fn new(service_name: impl Into<String>, total_price: RawAmount) -> Self {
        Self {
            service_name: service_name.into(),
            service_code: None,
            total_price,
            currency: None,
            delivery: None,
        }
    }

    /// Sets the service code.
    #[must_use]
    pub fn with_service_code(mut self, code: impl Into<String>) -> Self {
        self.service_code = Some(code.into());
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Sets the delivery estimate.
    #[must_use]
    pub fn with_delivery(mut self, delivery: DeliveryEstimate) -> Self {
        self.delivery = Some(delivery);
        self
    }
}

/// Trait defining the interface for carrier rate clients.
///
/// A client performs its own transport, authentication, timeouts and
/// retries. It returns either the complete list of rates for a shipment or
/// a fault, never a partial list.
#[async_trait]
pub trait CarrierRateClient: Send + Sync + fmt::Debug {
    /// Returns the carrier ID.
    fn carrier_id(&self) -> &CarrierId;

    /// Fetches every rate the carrier offers for a shipment.
    ///
    /// # Arguments
    ///
    /// * `origin` - Complete origin location
    /// * `destination` - Complete destination location
    /// * `package` - Valid package
    ///
    /// # Errors
    ///
    /// - `CarrierFault::Timeout` / `Connection` - Transport failure
    /// - `CarrierFault::Authentication` - Credentials refused
    /// - `CarrierFault::Rejected` - Carrier refused the shipment
    /// - `CarrierFault::MalformedResponse` - Response could not be parsed
    async fn fetch_rates(
        &self,
        origin: &Location,
        destination: &Location,
        package: &Package,
    ) -> CarrierResult<Vec<RawRate>>;
}

/// Capability for looking up carrier rate clients by id.
#[async_trait]
pub trait CarrierRegistry: Send + Sync + fmt::Debug {
    /// Returns the client registered under an id.
    async fn get_carrier(&self, carrier_id: &CarrierId) -> Option<Arc<dyn CarrierRateClient>>;

    /// Returns every registered carrier id, sorted.
    async fn carrier_ids(&self) -> Vec<CarrierId>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raw_rate_builder() {
        let rate = RawRate::new("Priority Mail", RawAmount::Text("9.35".to_string()))
            .with_service_code("PRIORITY_MAIL")
            .with_currency("USD")
            .with_delivery(DeliveryEstimate::BusinessDays(2));

        assert_eq!(rate.service_code.as_deref(), Some("PRIORITY_MAIL"));
        assert_eq!(rate.currency.as_deref(), Some("USD"));
        assert_eq!(rate.delivery, Some(DeliveryEstimate::BusinessDays(2)));
    }

    #[test]
    fn raw_amount_display() {
        assert_eq!(RawAmount::MinorUnits(1299).to_string(), "1299 minor units");
        assert_eq!(RawAmount::Text("x".to_string()).to_string(), "'x'");
        assert_eq!(RawAmount::Decimal(Decimal::new(125, 1)).to_string(), "12.5");
    }
}
