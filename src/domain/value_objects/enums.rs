//! # Domain Enums
//!
//! Enumeration types for domain concepts.
//!
//! - [`UnitSystem`] - Metric or imperial package measurements
//! - [`RequestField`] - The three inputs of a rate request
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system of a package.
///
/// Metric packages are measured in kilograms and centimetres, imperial
/// packages in pounds and inches.
///
/// # Examples
///
/// ```
/// use shipping_rates::domain::value_objects::UnitSystem;
///
/// let units: UnitSystem = "imperial".parse().unwrap();
/// assert_eq!(units, UnitSystem::Imperial);
/// assert_eq!(units.weight_unit(), "lb");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilograms and centimetres.
    #[default]
    Metric,
    /// Pounds and inches.
    Imperial,
}

impl UnitSystem {
    /// Returns the abbreviation of the weight unit.
    #[inline]
    #[must_use]
    pub const fn weight_unit(self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lb",
        }
    }

    /// Returns the abbreviation of the length unit.
    #[inline]
    #[must_use]
    pub const fn length_unit(self) -> &'static str {
        match self {
            Self::Metric => "cm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "metric"),
            Self::Imperial => write!(f, "imperial"),
        }
    }
}

impl FromStr for UnitSystem {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            _ => Err(ParseEnumError::InvalidValue("UnitSystem", s.to_string())),
        }
    }
}

/// One of the three inputs of a rate request.
///
/// Ordered as origin, destination, package so that sets of fields print in
/// a stable, readable order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RequestField {
    /// Shipment origin.
    Origin,
    /// Shipment destination.
    Destination,
    /// Physical package.
    Package,
}

impl RequestField {
    /// All fields in declaration order.
    pub const ALL: [Self; 3] = [Self::Origin, Self::Destination, Self::Package];

    /// Returns the field name.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Destination => "destination",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for RequestField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "origin" => Ok(Self::Origin),
            "destination" => Ok(Self::Destination),
            "package" => Ok(Self::Package),
            _ => Err(ParseEnumError::InvalidValue("RequestField", s.to_string())),
        }
    }
}

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseEnumError {
    /// The provided string value is not valid for the enum.
    InvalidValue(&'static str, String),
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue(enum_name, value) => {
                write!(f, "invalid {} value: '{}'", enum_name, value)
            }
        }
    }
}

impl std::error::Error for ParseEnumError {}
