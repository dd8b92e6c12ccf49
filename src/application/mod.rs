//! # Application Layer
//!
//! Rate shopping use cases and their error types.

pub mod error;
pub mod services;

pub use error::{CarrierError, RateError, RateResult};
pub use services::RateShoppingService;
