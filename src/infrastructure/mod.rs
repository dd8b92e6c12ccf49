//! # Infrastructure Layer
//!
//! Adapters to carrier rate services.

pub mod carriers;
