//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Shipment Inputs
//!
//! - [`Location`]: Physical address with a completeness predicate
//! - [`Package`]: Weight and dimensions with a validity predicate
//! - [`Supplied`]: Tagged input slot (missing, typed value, wrong type)
//!
//! ## Identity and Amounts
//!
//! - [`CarrierId`]: Normalized carrier identifier
//! - [`Price`]: Non-negative decimal amount
//!
//! ## Domain Enums
//!
//! - [`UnitSystem`]: Metric or imperial
//! - [`RequestField`]: Origin, destination or package

pub mod enums;
pub mod ids;
pub mod location;
pub mod package;
pub mod price;
pub mod supplied;

pub use enums::{ParseEnumError, RequestField, UnitSystem};
pub use ids::CarrierId;
pub use location::{Location, LocationBuilder};
pub use package::{Dimensions, Package, PackageDefect, is_valid_package};
pub use price::Price;
pub use supplied::Supplied;
