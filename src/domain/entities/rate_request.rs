//! # Rate Request Entity
//!
//! The origin, destination and package of a shipment, and the validation
//! that gates every carrier query.
//!
//! A [`RateRequest`] is stateless beyond its three inputs. Validation never
//! short-circuits: each input is checked independently and every failing
//! field is reported in the [`ValidationReport`].
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::entities::RateRequest;
//! use shipping_rates::domain::value_objects::{Location, Package, RequestField, UnitSystem};
//!
//! let request = RateRequest::builder()
//!     .origin(Location::new("US", "CA", "Beverly Hills", "90210"))
//!     .destination(Location::builder().country("US").state("WA").city("Seattle").build())
//!     .package(Package::new(12.0, [15.0, 10.0, 4.5], UnitSystem::Imperial)?)
//!     .build();
//!
//! let report = request.validate();
//! assert!(!report.is_valid());
//! assert_eq!(report.errors().into_iter().collect::<Vec<_>>(), vec![RequestField::Destination]);
//! # Ok::<(), shipping_rates::domain::errors::DomainError>(())
//! ```

use crate::domain::errors::ValidationError;
use crate::domain::value_objects::{
    Location, Package, PackageDefect, RequestField, Supplied, is_valid_package,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Why one input of a rate request is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum FieldIssue {
    /// Nothing was supplied.
    Missing,
    /// A value of another type was supplied.
    WrongType {
        /// Description of the supplied value.
        found: String,
    },
    /// The location lacks one or more address attributes.
    IncompleteLocation {
        /// Names of the absent attributes.
        missing: Vec<&'static str>,
    },
    /// The package has a non-positive measurement.
    InvalidPackage {
        /// Description of the defect.
        reason: String,
    },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "missing"),
            Self::WrongType { found } => write!(f, "wrong type ({found})"),
            Self::IncompleteLocation { missing } => {
                write!(f, "incomplete location (missing {})", missing.join(", "))
            }
            Self::InvalidPackage { reason } => write!(f, "invalid package ({reason})"),
        }
    }
}

/// Outcome of validating a rate request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: BTreeMap<RequestField, FieldIssue>,
}

impl ValidationReport {
    /// Returns true if no field failed validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Returns the names of the fields that failed validation.
    #[must_use]
    pub fn errors(&self) -> BTreeSet<RequestField> {
        self.issues.keys().copied().collect()
    }

    /// Returns true if the given field failed validation.
    #[must_use]
    pub fn has_error(&self, field: RequestField) -> bool {
        self.issues.contains_key(&field)
    }

    /// Returns the issue recorded for a field, if any.
    #[must_use]
    pub fn issue(&self, field: RequestField) -> Option<&FieldIssue> {
        self.issues.get(&field)
    }

    /// Iterates over failing fields and their issues, in field order.
    pub fn iter(&self) -> impl Iterator<Item = (RequestField, &FieldIssue)> {
        self.issues.iter().map(|(field, issue)| (*field, issue))
    }

    fn record(&mut self, field: RequestField, issue: Option<FieldIssue>) {
        if let Some(issue) = issue {
            self.issues.insert(field, issue);
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            return write!(f, "valid");
        }
        let parts: Vec<String> = self
            .iter()
            .map(|(field, issue)| format!("{field}: {issue}"))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Borrowed view of a request whose inputs all passed validation.
#[derive(Debug, Clone, Copy)]
pub struct ValidShipment<'a> {
    /// Complete origin location.
    pub origin: &'a Location,
    /// Complete destination location.
    pub destination: &'a Location,
    /// Valid package.
    pub package: &'a Package,
}

/// A shipment-quote inquiry.
///
/// # Invariants
///
/// Valid iff the origin and destination are present, typed and complete
/// locations and the package is present, typed and valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateRequest {
    origin: Supplied<Location>,
    destination: Supplied<Location>,
    package: Supplied<Package>,
}

impl RateRequest {
    /// Creates a request from its three inputs.
    #[must_use]
    pub fn new(
        origin: impl Into<Supplied<Location>>,
        destination: impl Into<Supplied<Location>>,
        package: impl Into<Supplied<Package>>,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            package: package.into(),
        }
    }

    /// Returns a builder; unset inputs stay missing.
    #[must_use]
    pub fn builder() -> RateRequestBuilder {
        RateRequestBuilder::default()
    }

    /// Creates a request from loosely typed JSON.
    ///
    /// Reads the `origin`, `destination` and `package` keys and
    /// discriminates each one with [`Supplied::from_json`]. A non-object
    /// document yields a request with every input missing.
    #[must_use]
    pub fn from_json(document: &Value) -> Self {
        let field = |name: &str| document.as_object().and_then(|map| map.get(name));
        Self {
            origin: Supplied::from_json(field(RequestField::Origin.as_str())),
            destination: Supplied::from_json(field(RequestField::Destination.as_str())),
            package: Supplied::from_json(field(RequestField::Package.as_str())),
        }
    }

    /// Returns the supplied origin.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> &Supplied<Location> {
        &self.origin
    }

    /// Returns the supplied destination.
    #[inline]
    #[must_use]
    pub fn destination(&self) -> &Supplied<Location> {
        &self.destination
    }

    /// Returns the supplied package.
    #[inline]
    #[must_use]
    pub fn package(&self) -> &Supplied<Package> {
        &self.package
    }

    /// Validates all three inputs independently.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();
        report.record(RequestField::Origin, location_issue(&self.origin));
        report.record(RequestField::Destination, location_issue(&self.destination));
        report.record(RequestField::Package, package_issue(&self.package));
        report
    }

    /// Returns true if the request passes validation.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_valid()
    }

    /// Validates the request and returns its typed inputs.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every failing field.
    pub fn ensure_valid(&self) -> Result<ValidShipment<'_>, ValidationError> {
        let report = self.validate();
        match (self.origin.value(), self.destination.value(), self.package.value()) {
            (Some(origin), Some(destination), Some(package)) if report.is_valid() => {
                Ok(ValidShipment {
                    origin,
                    destination,
                    package,
                })
            }
            _ => Err(ValidationError::new(report)),
        }
    }
}

fn slot_issue<T>(slot: &Supplied<T>) -> Option<FieldIssue> {
    match slot {
        Supplied::Missing => Some(FieldIssue::Missing),
        Supplied::WrongType(found) => Some(FieldIssue::WrongType {
            found: found.clone(),
        }),
        Supplied::Value(_) => None,
    }
}

fn location_issue(slot: &Supplied<Location>) -> Option<FieldIssue> {
    slot_issue(slot).or_else(|| {
        let location = slot.value()?;
        (!location.is_complete()).then(|| FieldIssue::IncompleteLocation {
            missing: location.missing_fields(),
        })
    })
}

fn package_issue(slot: &Supplied<Package>) -> Option<FieldIssue> {
    if is_valid_package(slot) {
        return None;
    }
    slot_issue(slot).or_else(|| {
        let reason = slot
            .value()
            .and_then(Package::defect)
            .map_or_else(|| "invalid".to_string(), |d: PackageDefect| d.to_string());
        Some(FieldIssue::InvalidPackage { reason })
    })
}

/// Builder for [`RateRequest`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct RateRequestBuilder {
    inner: RateRequest,
}

impl RateRequestBuilder {
    /// Sets the origin.
    pub fn origin(mut self, origin: impl Into<Supplied<Location>>) -> Self {
        self.inner.origin = origin.into();
        self
    }

    /// Sets the destination.
    pub fn destination(mut self, destination: impl Into<Supplied<Location>>) -> Self {
        self.inner.destination = destination.into();
        self
    }

    /// Sets the package.
    pub fn package(mut self, package: impl Into<Supplied<Package>>) -> Self {
        self.inner.package = package.into();
        self
    }

    /// Builds the request.
    pub fn build(self) -> RateRequest {
        self.inner
    }
}
