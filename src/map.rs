//! Ordered map type for GEON mapping blocks.
//!
//! This module provides [`GeonMap`], a wrapper around [`IndexMap`] that keeps
//! entries in the order they were inserted. The block parser inserts keys in
//! source order and the generator writes them back in the same order, so a
//! parsed extension block comes back out exactly as it went in.
//!
//! Unlike `IndexMap`, equality on `GeonMap` is order-sensitive: two maps with
//! the same entries in a different order render differently, so they are not
//! equal.
//!
//! ## Examples
//!
//! ```rust
//! use geon::{GeonMap, Value};
//!
//! let mut map = GeonMap::new();
//! map.insert("surface".to_string(), Value::from("cobbles"));
//! map.insert("width".to_string(), Value::from("6m"));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("surface").and_then(|v| v.as_str()), Some("cobbles"));
//! ```

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// An ordered map of string keys to GEON values.
#[derive(Debug, Clone, Default)]
pub struct GeonMap(IndexMap<String, crate::Value>);

impl GeonMap {
    /// Creates an empty `GeonMap`.
    #[must_use]
    pub fn new() -> Self {
        GeonMap(IndexMap::new())
    }

    /// Creates an empty `GeonMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        GeonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the value is replaced in place
    /// (the key keeps its original position) and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geon::{GeonMap, Value};
    ///
    /// let mut map = GeonMap::new();
    /// assert!(map.insert("key".to_string(), Value::from("a")).is_none());
    /// assert!(map.insert("key".to_string(), Value::from("b")).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut crate::Value> {
        self.0.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first entry in insertion order.
    #[must_use]
    pub fn first(&self) -> Option<(&String, &crate::Value)> {
        self.0.first()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl PartialEq for GeonMap {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Serialize for GeonMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter())
    }
}

impl<'de> serde::Deserialize<'de> for GeonMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match <crate::Value as serde::Deserialize>::deserialize(deserializer)? {
            crate::Value::Map(map) => Ok(map),
            _ => Err(serde::de::Error::custom("expected a mapping")),
        }
    }
}

impl From<HashMap<String, crate::Value>> for GeonMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        GeonMap(map.into_iter().collect())
    }
}

impl From<BTreeMap<String, String>> for GeonMap {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter()
            .map(|(k, v)| (k, crate::Value::Scalar(v)))
            .collect()
    }
}

impl IntoIterator for GeonMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a GeonMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for GeonMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        GeonMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, crate::Value)> for GeonMap {
    fn extend<T: IntoIterator<Item = (String, crate::Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}
