//! # Supplied Inputs
//!
//! Tagged representation of a value handed to the rate-shopping boundary.
//!
//! Callers building requests in Rust always supply typed values, but
//! requests that arrive as loosely typed data (JSON from a checkout form,
//! for instance) may carry a string where an address was expected.
//! [`Supplied`] records that distinction explicitly instead of coercing the
//! foreign value.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

/// A value supplied for one input of a rate request.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use shipping_rates::domain::value_objects::{Location, Supplied};
///
/// let typed: Supplied<Location> = Supplied::from_json(Some(&json!({"country": "US"})));
/// assert!(typed.value().is_some());
///
/// let text: Supplied<Location> = Supplied::from_json(Some(&json!("location")));
/// assert!(text.is_wrong_type());
///
/// let absent: Supplied<Location> = Supplied::from_json(None);
/// assert!(absent.is_missing());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Supplied<T> {
    /// Nothing was supplied.
    #[default]
    Missing,
    /// A value of the expected type.
    Value(T),
    /// A value of some other type; carries a short description of it.
    WrongType(String),
}

impl<T> Supplied<T> {
    /// Creates a wrong-type slot from a description of the foreign value.
    #[must_use]
    pub fn wrong_type(found: impl Into<String>) -> Self {
        Self::WrongType(found.into())
    }

    /// Returns the typed value, if one was supplied.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            Self::Missing | Self::WrongType(_) => None,
        }
    }

    /// Returns true if nothing was supplied.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns true if a value of another type was supplied.
    #[must_use]
    pub fn is_wrong_type(&self) -> bool {
        matches!(self, Self::WrongType(_))
    }
}

impl<T: DeserializeOwned> Supplied<T> {
    /// Discriminates a JSON value against the expected type.
    ///
    /// - absent or `null` becomes [`Supplied::Missing`]
    /// - an object that deserializes into `T` becomes [`Supplied::Value`]
    /// - anything else, including objects of the wrong shape, becomes
    ///   [`Supplied::WrongType`]
    #[must_use]
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Missing,
            Some(value @ Value::Object(_)) => match serde_json::from_value::<T>(value.clone()) {
                Ok(typed) => Self::Value(typed),
                Err(e) => Self::WrongType(format!("object ({e})")),
            },
            Some(other) => Self::WrongType(json_kind(other).to_string()),
        }
    }
}

impl<T> From<T> for Supplied<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> From<Option<T>> for Supplied<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Self::Value)
    }
}

impl<T: fmt::Display> fmt::Display for Supplied<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "<missing>"),
            Self::Value(value) => write!(f, "{value}"),
            Self::WrongType(found) => write!(f, "<{found}>"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{Location, Package};
    use serde_json::json;

    #[test]
    fn null_is_missing() {
        let slot: Supplied<Location> = Supplied::from_json(Some(&Value::Null));
        assert!(slot.is_missing());
    }

    #[test]
    fn string_is_wrong_type_even_when_non_empty() {
        let slot: Supplied<Package> = Supplied::from_json(Some(&json!("package")));
        assert_eq!(slot, Supplied::wrong_type("string"));
    }

    #[test]
    fn scalars_and_arrays_are_wrong_type() {
        for value in [json!(42), json!(true), json!(["US", "WA"])] {
            let slot: Supplied<Location> = Supplied::from_json(Some(&value));
            assert!(slot.is_wrong_type(), "{value} should be rejected");
        }
    }

    #[test]
    fn object_of_other_shape_is_wrong_type() {
        let package = json!({"weight": 1, "dimensions": [1, 1, 1]});
        let slot: Supplied<Location> = Supplied::from_json(Some(&package));
        assert!(slot.is_wrong_type());
    }

    #[test]
    fn typed_object_is_value() {
        let slot: Supplied<Location> = Supplied::from_json(Some(&json!({
            "country": "US", "state": "WA", "city": "Seattle", "postal_code": "98101"
        })));
        assert!(slot.value().unwrap().is_complete());
    }

    #[test]
    fn from_option() {
        let slot: Supplied<u8> = Supplied::from(None::<u8>);
        assert!(slot.is_missing());
        let slot: Supplied<u8> = Supplied::from(Some(1_u8));
        assert_eq!(slot.value(), Some(&1));
        let slot: Supplied<u8> = 7_u8.into();
        assert_eq!(slot.value(), Some(&7));
    }
}
