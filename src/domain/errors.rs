//! # Domain Errors
//!
//! Errors raised while constructing domain values.
//!
//! Validation of a rate request is not a [`DomainError`]: an incomplete
//! location or an invalid package is reported through
//! predicates and a [`ValidationReport`](crate::domain::entities::ValidationReport).
//! `DomainError` covers values that cannot exist at all, such as a
//! negative price.

use crate::domain::entities::rate_request::ValidationReport;
use crate::domain::value_objects::RequestField;
use std::collections::BTreeSet;
use thiserror::Error;

/// Error type for domain value construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Price is negative or not representable.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A carrier identifier is empty.
    #[error("invalid carrier id: {0}")]
    InvalidCarrierId(String),

    /// A package measurement cannot be represented as a decimal.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// A quote is missing a required attribute.
    #[error("invalid rate quote: {0}")]
    InvalidQuote(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// A rate lookup was attempted on an invalid rate request.
///
/// Carries the full [`ValidationReport`], so every failing field is
/// available, not just the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid rate request: {report}")]
pub struct ValidationError {
    report: ValidationReport,
}

impl ValidationError {
    /// Creates a validation error from a failed report.
    #[must_use]
    pub fn new(report: ValidationReport) -> Self {
        Self { report }
    }

    /// Returns the names of the invalid fields.
    #[must_use]
    pub fn fields(&self) -> BTreeSet<RequestField> {
        self.report.errors()
    }

    /// Returns the full validation report.
    #[must_use]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::RateRequest;

    #[test]
    fn display_format() {
        let err = DomainError::InvalidPrice("must not be negative".to_string());
        assert_eq!(err.to_string(), "invalid price: must not be negative");
    }

    #[test]
    fn validation_error_lists_fields() {
        let err = RateRequest::default().ensure_valid().unwrap_err();
        assert_eq!(err.fields().len(), 3);
        assert_eq!(
            err.to_string(),
            "invalid rate request: origin: missing; destination: missing; package: missing"
        );
    }
}
