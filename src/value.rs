//! Generic value tree for GEON blocks.
//!
//! This module provides the [`Value`] enum, the intermediate form between
//! GEON text and the typed [`Place`](crate::Place) model. The block parser
//! produces it, the entity mapper consumes it, and the extension bag of a
//! place stores it so unknown fields survive a parse/generate round-trip.
//!
//! The notation has no scalar types beyond text, so a value is one of exactly
//! three things:
//!
//! - [`Value::Scalar`]: the text after `KEY: `
//! - [`Value::List`]: a block of `- ` items
//! - [`Value::Map`]: a block of `KEY: value` lines
//!
//! ## Examples
//!
//! ```rust
//! use geon::{parse_value, Value};
//!
//! let value = parse_value("SURFACE: cobbles\nLANES:\n  - north\n  - south").unwrap();
//! let map = value.as_map().unwrap();
//! assert_eq!(map.get("SURFACE").and_then(Value::as_str), Some("cobbles"));
//! assert_eq!(map.get("LANES").and_then(Value::as_list).map(Vec::len), Some(2));
//! ```

use crate::GeonMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A node of the generic GEON tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(String),
    List(Vec<Value>),
    Map(GeonMap),
}

impl Default for Value {
    fn default() -> Self {
        Value::List(Vec::new())
    }
}

impl Value {
    /// Returns `true` if the value is a scalar.
    #[inline]
    #[must_use]
    pub const fn is_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// Returns `true` if the value is a list.
    #[inline]
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Returns `true` if the value is a mapping.
    #[inline]
    #[must_use]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns `true` for an empty list or an empty mapping.
    ///
    /// An empty scalar is not an empty container: `KEY:` with nothing below
    /// parses as an empty list.
    #[must_use]
    pub fn is_empty_container(&self) -> bool {
        match self {
            Value::Scalar(_) => false,
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// If the value is a scalar, returns its text. Otherwise returns `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geon::Value;
    ///
    /// assert_eq!(Value::from("hello").as_str(), Some("hello"));
    /// assert_eq!(Value::List(vec![]).as_str(), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a list, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// If the value is a mapping, returns a reference to it. Otherwise returns `None`.
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> Option<&GeonMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// If the value is a mapping, returns a mutable reference to it.
    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut GeonMap> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Renders the value as single-line text.
///
/// Scalars print as-is, list items are joined with `, `, and mapping entries
/// print as `key: value`. The synthetic `_value` key of a promoted list item
/// prints bare.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            Value::Map(map) => {
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if k == crate::de::ITEM_VALUE_KEY {
                        write!(f, "{}", v)?;
                    } else {
                        write!(f, "{}: {}", k, v)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Scalar(s) => serializer.serialize_str(s),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        // Text is the only scalar type, so typed scalars become their text.
        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any value representable in GEON")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> Result<Self::Value, E> {
                Ok(Value::Scalar(value))
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(Value::List(Vec::new()))
            }

            fn visit_none<E>(self) -> Result<Self::Value, E> {
                Ok(Value::List(Vec::new()))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(elem) = seq.next_element()? {
                    vec.push(elem);
                }
                Ok(Value::List(vec))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut values = GeonMap::new();
                while let Some((key, value)) = map.next_entry()? {
                    values.insert(key, value);
                }
                Ok(Value::Map(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl TryFrom<Value> for String {
    type Error = crate::Error;

    fn try_from(value: Value) -> crate::Result<Self> {
        match value {
            Value::Scalar(s) => Ok(s),
            other => Err(crate::Error::custom(format!(
                "expected a scalar, found {}",
                if other.is_list() { "a list" } else { "a mapping" }
            ))),
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Scalar(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Scalar(value.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Value::List(value.into_iter().map(Value::Scalar).collect())
    }
}

impl From<GeonMap> for Value {
    fn from(value: GeonMap) -> Self {
        Value::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tryfrom_string() {
        let value = Value::Scalar("hello".to_string());
        let result: String = TryFrom::try_from(value).unwrap();
        assert_eq!(result, "hello");

        assert!(String::try_from(Value::List(vec![])).is_err());
    }

    #[test]
    fn test_from_primitives() {
        assert_eq!(Value::from("test"), Value::Scalar("test".to_string()));
        assert_eq!(Value::from(42i64), Value::Scalar("42".to_string()));
        assert_eq!(Value::from(51.5f64), Value::Scalar("51.5".to_string()));
    }

    #[test]
    fn test_display_flattens() {
        let list = Value::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(list.to_string(), "a, b");

        let mut map = GeonMap::new();
        map.insert("_value".to_string(), Value::from("Fountain"));
        map.insert("height".to_string(), Value::from("4m"));
        assert_eq!(Value::Map(map).to_string(), "Fountain, height: 4m");
    }

    #[test]
    fn test_json_roundtrip_coerces_scalars() {
        let value: Value = serde_json::from_str(r#"{"levels": 3, "lit": true, "tags": ["a"]}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get("levels"), Some(&Value::from("3")));
        assert_eq!(map.get("lit"), Some(&Value::from("true")));
        assert_eq!(map.get("tags"), Some(&Value::List(vec![Value::from("a")])));

        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"levels":"3","lit":"true","tags":["a"]}"#);
    }

    #[test]
    fn test_empty_container() {
        assert!(Value::default().is_empty_container());
        assert!(Value::Map(GeonMap::new()).is_empty_container());
        assert!(!Value::from("").is_empty_container());
    }
}
