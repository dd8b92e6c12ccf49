//! # Domain Entities
//!
//! ## Aggregates
//!
//! - [`RateRequest`]: Origin, destination and package of a shipment, with
//!   field-by-field validation
//!
//! ## Entities
//!
//! - [`RateQuote`]: Normalized price offer from a carrier

pub mod rate_quote;
pub mod rate_request;

pub use rate_quote::{DEFAULT_CURRENCY, DeliveryEstimate, RateQuote, RateQuoteBuilder};
pub use rate_request::{
    FieldIssue, RateRequest, RateRequestBuilder, ValidShipment, ValidationReport,
};
