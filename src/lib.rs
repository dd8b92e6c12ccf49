//! # Shipping Rates
//!
//! Shipment validation and price-ordered rate shopping across carrier
//! rate services (UPS, USPS and any other [`CarrierRateClient`]).
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Locations, packages, rate requests and quotes
//! - **Application Layer** (`application`): Rate shopping across carriers
//! - **Infrastructure Layer** (`infrastructure`): Carrier clients and registry
//!
//! ## Example
//!
//! ```rust,ignore
//! use shipping_rates::application::RateShoppingService;
//! use shipping_rates::domain::entities::RateRequest;
//! use shipping_rates::domain::value_objects::{CarrierId, Location, Package, UnitSystem};
//!
//! let request = RateRequest::new(
//!     Location::new("US", "CA", "Beverly Hills", "90210"),
//!     Location::new("US", "WA", "Seattle", "98101"),
//!     Package::new(12.0, [15.0, 10.0, 4.5], UnitSystem::Imperial)?,
//! );
//! let quotes = service.rates_from(&request, &CarrierId::ups()).await?;
//! ```
//!
//! [`CarrierRateClient`]: infrastructure::carriers::CarrierRateClient

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
