//! # Identifiers
//!
//! String-based identifiers for carriers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::{DomainError, DomainResult};

/// Identifier of a shipping carrier, e.g. `UPS` or `USPS`.
///
/// Identifiers are trimmed and upper-cased on construction so that
/// `"ups"`, `" UPS "` and `"UPS"` name the same carrier.
///
/// # Examples
///
/// ```
/// use shipping_rates::domain::value_objects::CarrierId;
///
/// assert_eq!(CarrierId::new("ups"), CarrierId::new("UPS"));
/// assert_eq!(CarrierId::new("usps").as_str(), "USPS");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CarrierId(String);

impl CarrierId {
    /// Well-known identifier for UPS.
    pub const UPS: &'static str = "UPS";

    /// Well-known identifier for USPS.
    pub const USPS: &'static str = "USPS";

    /// Creates a carrier identifier, normalizing case and whitespace.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    /// Returns the identifier of UPS.
    #[must_use]
    pub fn ups() -> Self {
        Self(Self::UPS.to_string())
    }

    /// Returns the identifier of USPS.
    #[must_use]
    pub fn usps() -> Self {
        Self(Self::USPS.to_string())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CarrierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CarrierId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Self::new(s);
        if id.0.is_empty() {
            return Err(DomainError::InvalidCarrierId(
                "carrier id must not be empty".to_string(),
            ));
        }
        Ok(id)
    }
}

impl TryFrom<String> for CarrierId {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        value.parse()
    }
}

impl From<CarrierId> for String {
    fn from(id: CarrierId) -> Self {
        id.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(CarrierId::new("  ups ").as_str(), "UPS");
        assert_eq!(CarrierId::new("Usps"), CarrierId::usps());
    }

    #[test]
    fn parse_rejects_empty() {
        assert!("   ".parse::<CarrierId>().is_err());
        assert_eq!("fedex".parse::<CarrierId>().unwrap().as_str(), "FEDEX");
    }

    #[test]
    fn serde_roundtrip_normalizes() {
        let id: CarrierId = serde_json::from_str("\"ups\"").unwrap();
        assert_eq!(id, CarrierId::ups());
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"UPS\"");
    }
}
