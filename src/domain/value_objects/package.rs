//! # Package Value Object
//!
//! Weight and dimensions of a physical shipment.
//!
//! The rate-shopping core only asks one question of a package: is it a
//! well-formed value? [`Package::is_valid`] answers it for a typed package
//! and [`is_valid_package`] answers it for any supplied input, including
//! values of the wrong type.
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::value_objects::{Package, UnitSystem};
//!
//! let package = Package::new(12.0, [15.0, 10.0, 4.5], UnitSystem::Imperial)?;
//! assert!(package.is_valid());
//!
//! let flat = Package::new(12.0, [15.0, 10.0, 0.0], UnitSystem::Imperial)?;
//! assert!(!flat.is_valid());
//! # Ok::<(), shipping_rates::domain::errors::DomainError>(())
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::enums::UnitSystem;
use crate::domain::value_objects::supplied::Supplied;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kilograms per pound.
const KG_PER_LB: Decimal = Decimal::from_parts(45_359_237, 0, 0, false, 8);

/// Centimetres per inch.
const CM_PER_IN: Decimal = Decimal::from_parts(254, 0, 0, false, 2);

/// Decimal places kept after a unit conversion.
const CONVERSION_SCALE: u32 = 4;

/// Length, width and height of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[Decimal; 3]", into = "[Decimal; 3]")]
pub struct Dimensions {
    length: Decimal,
    width: Decimal,
    height: Decimal,
}

impl Dimensions {
    /// Creates dimensions from decimal values.
    #[must_use]
    pub fn new(length: Decimal, width: Decimal, height: Decimal) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Returns the length.
    #[inline]
    #[must_use]
    pub fn length(&self) -> Decimal {
        self.length
    }

    /// Returns the width.
    #[inline]
    #[must_use]
    pub fn width(&self) -> Decimal {
        self.width
    }

    /// Returns the height.
    #[inline]
    #[must_use]
    pub fn height(&self) -> Decimal {
        self.height
    }

    /// Returns true if every side is strictly positive.
    #[must_use]
    pub fn are_positive(&self) -> bool {
        self.as_array().iter().all(|side| *side > Decimal::ZERO)
    }

    /// Returns the sides as `[length, width, height]`.
    #[must_use]
    pub fn as_array(&self) -> [Decimal; 3] {
        [self.length, self.width, self.height]
    }

    fn scaled(&self, f: impl Fn(Decimal) -> Decimal) -> Self {
        Self::new(f(self.length), f(self.width), f(self.height))
    }
}

impl From<[Decimal; 3]> for Dimensions {
    fn from([length, width, height]: [Decimal; 3]) -> Self {
        Self::new(length, width, height)
    }
}

impl From<Dimensions> for [Decimal; 3] {
    fn from(dimensions: Dimensions) -> Self {
        dimensions.as_array()
    }
}

/// Why a package is not valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageDefect {
    /// Weight is zero or negative.
    NonPositiveWeight,
    /// At least one side is zero or negative.
    NonPositiveDimension,
}

impl fmt::Display for PackageDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveWeight => write!(f, "weight must be positive"),
            Self::NonPositiveDimension => write!(f, "dimensions must be positive"),
        }
    }
}

/// A physical package.
///
/// # Invariants
///
/// A package is *valid* iff its weight and all three dimensions are
/// strictly positive. The unit system is always one of the two recognized
/// values because [`UnitSystem`] has no other variants; unrecognized unit
/// names fail at parse or deserialize time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Package {
    weight: Decimal,
    dimensions: Dimensions,
    #[serde(default)]
    units: UnitSystem,
}

impl Package {
    /// Creates a package from floating point measurements.
    ///
    /// Zero and negative measurements are accepted and make the package
    /// invalid; see [`Package::defect`].
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidMeasurement` if a measurement is not
    /// finite, or is non-zero but too large or too small to keep its value
    /// as a decimal.
    pub fn new(weight: f64, dimensions: [f64; 3], units: UnitSystem) -> DomainResult<Self> {
        let [length, width, height] = dimensions;
        Ok(Self {
            weight: to_decimal("weight", weight)?,
            dimensions: Dimensions::new(
                to_decimal("length", length)?,
                to_decimal("width", width)?,
                to_decimal("height", height)?,
            ),
            units,
        })
    }

    /// Creates a package from decimal measurements.
    #[must_use]
    pub fn from_decimal(weight: Decimal, dimensions: Dimensions, units: UnitSystem) -> Self {
        Self {
            weight,
            dimensions,
            units,
        }
    }

    /// Returns the weight in the package's unit system.
    #[inline]
    #[must_use]
    pub fn weight(&self) -> Decimal {
        self.weight
    }

    /// Returns the dimensions in the package's unit system.
    #[inline]
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    /// Returns the unit system.
    #[inline]
    #[must_use]
    pub fn units(&self) -> UnitSystem {
        self.units
    }

    /// Returns true if weight and dimensions are strictly positive.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.defect().is_none()
    }

    /// Returns the first defect that makes this package invalid.
    #[must_use]
    pub fn defect(&self) -> Option<PackageDefect> {
        if self.weight <= Decimal::ZERO {
            return Some(PackageDefect::NonPositiveWeight);
        }
        if !self.dimensions.are_positive() {
            return Some(PackageDefect::NonPositiveDimension);
        }
        None
    }

    /// Returns the package measured in pounds and inches.
    #[must_use]
    pub fn to_imperial(&self) -> Self {
        match self.units {
            UnitSystem::Imperial => *self,
            UnitSystem::Metric => Self {
                weight: convert(self.weight, |w| w / KG_PER_LB),
                dimensions: self.dimensions.scaled(|d| convert(d, |d| d / CM_PER_IN)),
                units: UnitSystem::Imperial,
            },
        }
    }

    /// Returns the package measured in kilograms and centimetres.
    #[must_use]
    pub fn to_metric(&self) -> Self {
        match self.units {
            UnitSystem::Metric => *self,
            UnitSystem::Imperial => Self {
                weight: convert(self.weight, |w| w * KG_PER_LB),
                dimensions: self.dimensions.scaled(|d| convert(d, |d| d * CM_PER_IN)),
                units: UnitSystem::Metric,
            },
        }
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.units.length_unit();
        write!(
            f,
            "{}{} {}x{}x{}{}",
            self.weight,
            self.units.weight_unit(),
            self.dimensions.length,
            self.dimensions.width,
            self.dimensions.height,
            unit
        )
    }
}

/// Returns true if the supplied value is a package and that package is valid.
///
/// Missing values and values of any other type are never valid packages.
#[must_use]
pub fn is_valid_package(value: &Supplied<Package>) -> bool {
    value.value().is_some_and(Package::is_valid)
}

fn to_decimal(name: &str, value: f64) -> DomainResult<Decimal> {
    match Decimal::from_f64(value) {
        Some(decimal) if !(decimal.is_zero() && value.abs() > 0.0) => Ok(decimal.normalize()),
        _ => Err(DomainError::InvalidMeasurement(format!(
            "{name} {value} is not representable"
        ))),
    }
}

fn convert(value: Decimal, f: impl Fn(Decimal) -> Decimal) -> Decimal {
    f(value).round_dp(CONVERSION_SCALE).normalize()
}
