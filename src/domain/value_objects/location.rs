//! # Location Value Object
//!
//! Physical address used as shipment origin or destination.
//!
//! A [`Location`] may be built from partial address data; whether it can be
//! used in a rate request is answered by [`Location::is_complete`].
//!
//! # Examples
//!
//! ```
//! use shipping_rates::domain::value_objects::Location;
//!
//! let seattle = Location::new("US", "WA", "Seattle", "98101");
//! assert!(seattle.is_complete());
//!
//! let partial = Location::builder().country("US").state("WA").city("Seattle").build();
//! assert!(!partial.is_complete());
//! assert_eq!(partial.missing_fields(), vec!["postal_code"]);
//! ```

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A physical address.
///
/// Every attribute is optional at construction time so that raw address
/// data can be represented as received. Blank and whitespace-only values
/// count as absent.
///
/// Deserialization accepts `zip` for `postal_code` and `province` for
/// `state`, and ignores keys that are not address attributes. An object
/// with none of the address keys is rejected.
///
/// # Invariants
///
/// - Immutable once built
/// - Complete iff country, state, city and postal code are all non-empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LocationFields")]
pub struct Location {
    /// ISO country code, e.g. `US`.
    country: Option<String>,
    /// State or province code, e.g. `WA`.
    state: Option<String>,
    /// City name.
    city: Option<String>,
    /// Postal or ZIP code.
    postal_code: Option<String>,
}

/// Wire form of a [`Location`].
#[derive(Deserialize)]
struct LocationFields {
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    province: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    postal_code: Option<String>,
    #[serde(default)]
    zip: Option<String>,
    #[serde(flatten)]
    other: BTreeMap<String, IgnoredAny>,
}

impl TryFrom<LocationFields> for Location {
    type Error = String;

    fn try_from(fields: LocationFields) -> Result<Self, Self::Error> {
        let LocationFields {
            country,
            state,
            province,
            city,
            postal_code,
            zip,
            other,
        } = fields;

        let has_address = [&country, &state, &province, &city, &postal_code, &zip]
            .iter()
            .any(|field| field.is_some());
        if !has_address && !other.is_empty() {
            let keys: Vec<&str> = other.keys().map(String::as_str).collect();
            return Err(format!("no address attributes among: {}", keys.join(", ")));
        }

        Ok(Self {
            country,
            state: prefer(state, province),
            city,
            postal_code: prefer(postal_code, zip),
        })
    }
}

impl Location {
    /// Creates a location with all four attributes.
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        state: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            country: Some(country.into()),
            state: Some(state.into()),
            city: Some(city.into()),
            postal_code: Some(postal_code.into()),
        }
    }

    /// Returns a builder for partial address data.
    #[must_use]
    pub fn builder() -> LocationBuilder {
        LocationBuilder::default()
    }

    /// Returns the country, if present and non-blank.
    #[must_use]
    pub fn country(&self) -> Option<&str> {
        non_blank(self.country.as_deref())
    }

    /// Returns the state or province, if present and non-blank.
    #[must_use]
    pub fn state(&self) -> Option<&str> {
        non_blank(self.state.as_deref())
    }

    /// Returns the city, if present and non-blank.
    #[must_use]
    pub fn city(&self) -> Option<&str> {
        non_blank(self.city.as_deref())
    }

    /// Returns the postal code, if present and non-blank.
    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        non_blank(self.postal_code.as_deref())
    }

    /// Returns true if all four attributes are present and non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Returns the names of absent or blank attributes.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("country", self.country()),
            ("state", self.state()),
            ("city", self.city()),
            ("postal_code", self.postal_code()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect()
    }

    /// Returns true if the location is in the given country.
    #[must_use]
    pub fn is_in_country(&self, code: &str) -> bool {
        self.country()
            .is_some_and(|country| country.trim().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unknown = "?";
        write!(
            f,
            "{}, {} {}, {}",
            self.city().unwrap_or(unknown),
            self.state().unwrap_or(unknown),
            self.postal_code().unwrap_or(unknown),
            self.country().unwrap_or(unknown)
        )
    }
}

fn prefer(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    if non_blank(primary.as_deref()).is_some() {
        primary
    } else {
        fallback.or(primary)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Builder for [`Location`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct LocationBuilder {
    inner: Location,
}

impl LocationBuilder {
    /// Sets the country.
    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.inner.country = Some(country.into());
        self
    }

    /// Sets the state or province.
    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.inner.state = Some(state.into());
        self
    }

    /// Sets the city.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.inner.city = Some(city.into());
        self
    }

    /// Sets the postal code.
    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.inner.postal_code = Some(postal_code.into());
        self
    }

    /// Builds the location.
    pub fn build(self) -> Location {
        self.inner
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn seattle() -> Location {
        Location::new("US", "WA", "Seattle", "98101")
    }

    #[test]
    fn complete_location() {
        assert!(seattle().is_complete());
        assert!(seattle().missing_fields().is_empty());
    }

    #[test]
    fn each_missing_attribute_makes_it_incomplete() {
        let cases = [
            (Location::builder().state("WA").city("Seattle").postal_code("98101"), "country"),
            (Location::builder().country("US").city("Seattle").postal_code("98101"), "state"),
            (Location::builder().country("US").state("WA").postal_code("98101"), "city"),
            (Location::builder().country("US").state("WA").city("Seattle"), "postal_code"),
        ];

        for (builder, missing) in cases {
            let location = builder.build();
            assert!(!location.is_complete());
            assert_eq!(location.missing_fields(), vec![missing]);
        }
    }

    #[test]
    fn blank_values_count_as_missing() {
        let location = Location::new("US", "  ", "Seattle", "");
        assert!(!location.is_complete());
        assert_eq!(location.missing_fields(), vec!["state", "postal_code"]);
        assert_eq!(location.state(), None);
    }

    #[test]
    fn empty_location() {
        let location = Location::default();
        assert_eq!(location.missing_fields().len(), 4);
    }

    #[test]
    fn deserialize_accepts_zip_alias() {
        let location: Location = serde_json::from_str(
            r#"{"country":"US","state":"CA","city":"Beverly Hills","zip":"90210"}"#,
        )
        .unwrap();
        assert!(location.is_complete());
        assert_eq!(location.postal_code(), Some("90210"));
    }

    #[test]
    fn deserialize_rejects_object_without_address_fields() {
        let result = serde_json::from_str::<Location>(r#"{"weight": 12}"#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("no address attributes"), "{err}");
    }

    #[test]
    fn deserialize_ignores_extra_keys() {
        let location: Location = serde_json::from_str(
            r#"{"country":"US","state":"WA","city":"Seattle","zip":"98101","street":"1st Ave"}"#,
        )
        .unwrap();
        assert_eq!(location, seattle());
    }

    #[test]
    fn deserialize_with_both_postal_keys_prefers_postal_code() {
        let location: Location = serde_json::from_str(
            r#"{"country":"US","state":"WA","city":"Seattle","postal_code":"98101","zip":"98109"}"#,
        )
        .unwrap();
        assert_eq!(location.postal_code(), Some("98101"));

        let blank_primary: Location = serde_json::from_str(
            r#"{"country":"US","province":"WA","city":"Seattle","postal_code":" ","zip":"98101"}"#,
        )
        .unwrap();
        assert_eq!(blank_primary, seattle());
    }

    #[test]
    fn deserialize_empty_object_is_empty_location() {
        let location: Location = serde_json::from_str("{}").unwrap();
        assert_eq!(location, Location::default());
    }

    #[test]
    fn country_match() {
        assert!(seattle().is_in_country("us"));
        assert!(!seattle().is_in_country("CA"));
    }

    #[test]
    fn display() {
        assert_eq!(seattle().to_string(), "Seattle, WA 98101, US");
        let partial = Location::builder().city("Seattle").build();
        assert_eq!(partial.to_string(), "Seattle, ? ?, ?");
    }
}
