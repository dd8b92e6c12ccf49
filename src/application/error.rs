//! # Application Errors
//!
//! Error types for rate shopping.
//!
//! # Error Hierarchy
//!
//! ```text
//! RateError
//! ├── Validation(ValidationError)  - The request failed validation
//! ├── Carrier(CarrierError)        - One carrier lookup failed
//! ├── NoCarriers                   - No carrier was requested
//! └── CurrencyMismatch             - Quotes cannot be ordered by price
//! ```
//!
//! # Examples
//!
//! ```
//! use shipping_rates::application::error::{CarrierError, RateError};
//! use shipping_rates::domain::value_objects::CarrierId;
//! use shipping_rates::infrastructure::carriers::CarrierFault;
//!
//! let err = CarrierError::new(CarrierId::ups(), CarrierFault::timeout("slow"));
//! let err: RateError = err.into();
//! assert_eq!(err.carrier(), Some(&CarrierId::ups()));
//! ```

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{CarrierId, RequestField};
use crate::infrastructure::carriers::error::CarrierFault;
use std::collections::BTreeSet;
use thiserror::Error;

/// Failure of a single carrier lookup.
///
/// The message already includes the fault, which is available through
/// [`CarrierError::fault`] rather than as an error source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{carrier}: {fault}")]
pub struct CarrierError {
    carrier: CarrierId,
    fault: CarrierFault,
}

impl CarrierError {
    /// Creates a carrier error.
    #[must_use]
    pub fn new(carrier: CarrierId, fault: CarrierFault) -> Self {
        Self { carrier, fault }
    }

    /// Creates the error for a carrier without a registered client.
    #[must_use]
    pub fn not_registered(carrier: CarrierId) -> Self {
        Self::new(carrier, CarrierFault::NotRegistered)
    }

    /// Returns the carrier that failed.
    #[inline]
    #[must_use]
    pub fn carrier(&self) -> &CarrierId {
        &self.carrier
    }

    /// Returns what went wrong.
    #[inline]
    #[must_use]
    pub fn fault(&self) -> &CarrierFault {
        &self.fault
    }
}

/// Error type for rate shopping operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// The request failed validation. No carrier was contacted.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A carrier lookup failed. Results from other carriers are discarded.
    #[error(transparent)]
    Carrier(#[from] CarrierError),

    /// The carrier set was empty.
    #[error("no carriers requested")]
    NoCarriers,

    /// Quotes were reported in more than one currency.
    #[error("currency mismatch: expected {expected}, {carrier} quoted {found}")]
    CurrencyMismatch {
        /// Currency of the first quote.
        expected: String,
        /// Conflicting currency.
        found: String,
        /// Carrier that reported the conflicting currency.
        carrier: CarrierId,
    },
}

impl RateError {
    /// Returns the fields that failed validation, empty for other errors.
    #[must_use]
    pub fn invalid_fields(&self) -> BTreeSet<RequestField> {
        match self {
            Self::Validation(err) => err.fields(),
            _ => BTreeSet::new(),
        }
    }

    /// Returns the carrier at fault, if any.
    #[must_use]
    pub fn carrier(&self) -> Option<&CarrierId> {
        match self {
            Self::Carrier(err) => Some(err.carrier()),
            Self::CurrencyMismatch { carrier, .. } => Some(carrier),
            _ => None,
        }
    }

    /// Returns true if the caller's input was at fault.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Validation(_) | Self::NoCarriers => true,
            Self::Carrier(err) => err.fault().is_client_error(),
            Self::CurrencyMismatch { .. } => false,
        }
    }
}

/// Result type for rate shopping operations.
pub type RateResult<T> = Result<T, RateError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::RateRequest;

    #[test]
    fn carrier_error_display() {
        let err = CarrierError::new(CarrierId::usps(), CarrierFault::connection("refused"));
        assert_eq!(err.to_string(), "USPS: carrier connection error: refused");
    }

    #[test]
    fn not_registered_is_client_error() {
        let err: RateError = CarrierError::not_registered(CarrierId::new("dhl")).into();
        assert!(err.is_client_error());
        assert_eq!(err.carrier(), Some(&CarrierId::new("DHL")));
        assert_eq!(err.to_string(), "DHL: carrier not registered");
    }

    #[test]
    fn fault_text_appears_once_in_error_chain() {
        use std::error::Error as _;

        let err: RateError =
            CarrierError::new(CarrierId::usps(), CarrierFault::connection("refused")).into();
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }
        assert_eq!(chain.join(": ").matches("refused").count(), 1);
    }

    #[test]
    fn validation_error_exposes_fields() {
        let err = RateError::from(RateRequest::default().ensure_valid().unwrap_err());
        assert_eq!(err.invalid_fields().len(), 3);
        assert!(err.is_client_error());
        assert!(err.carrier().is_none());
    }

    #[test]
    fn currency_mismatch_display() {
        let err = RateError::CurrencyMismatch {
            expected: "USD".to_string(),
            found: "CAD".to_string(),
            carrier: CarrierId::ups(),
        };
        assert_eq!(
            err.to_string(),
            "currency mismatch: expected USD, UPS quoted CAD"
        );
        assert!(!err.is_client_error());
    }
}
