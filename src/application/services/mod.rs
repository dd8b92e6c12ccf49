//! # Application Services
//!
//! Services that orchestrate domain logic and carrier clients.
//!
//! - [`RateShoppingService`]: Validated, price-ordered rate lookups
//! - [`normalization`]: Raw carrier rates to [`RateQuote`](crate::domain::entities::RateQuote)

pub mod normalization;
pub mod rate_shopping;

pub use normalization::{ensure_single_currency, normalize, sort_by_price};
pub use rate_shopping::RateShoppingService;
