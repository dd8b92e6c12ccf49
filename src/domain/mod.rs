//! # Domain Layer
//!
//! Core shipment model. No I/O happens here.
//!
//! This layer contains:
//! - **Value Objects**: Location, Package, Price, identifiers, input slots
//! - **Entities**: Rate requests and normalized rate quotes
//! - **Errors**: Domain construction errors and the validation error

pub mod entities;
pub mod errors;
pub mod value_objects;
