//! Typed place model.
//!
//! [`Place`] is the central entity of GEON. Its fields are grouped the way a
//! GEON document is: identity, geometry, semantic, relational, temporal,
//! provenance, extended domain blocks, and an open extension bag for keys the
//! schema does not recognize.
//!
//! A place owns its children (`contains`) outright, so a document is always a
//! tree. `part_of` is a free-text label, not a reference.
//!
//! ## Examples
//!
//! ```rust
//! use geon::{Coordinate, Place};
//!
//! let mut park = Place::new("Arboretum", "public_space");
//! park.location = Some(Coordinate::new(52.9604, -1.1583));
//! park.purpose = vec!["leisure".to_string(), "contemplation".to_string()];
//! park.contains.push(Place::new("Bandstand", "landmark"));
//!
//! assert_eq!(park.contains.len(), 1);
//! ```

use crate::{Error, GeonMap, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Notation keys recognized by the entity mapper, in canonical emission order.
pub mod keys {
    pub const PLACE: &str = "PLACE";
    pub const TYPE: &str = "TYPE";
    pub const ID: &str = "ID";
    pub const LOCATION: &str = "LOCATION";
    pub const BOUNDARY: &str = "BOUNDARY";
    pub const EXTENT: &str = "EXTENT";
    pub const ELEVATION: &str = "ELEVATION";
    pub const AREA: &str = "AREA";
    pub const PURPOSE: &str = "PURPOSE";
    pub const EXPERIENCE: &str = "EXPERIENCE";
    pub const CHARACTER: &str = "CHARACTER";
    pub const ADJACENCIES: &str = "ADJACENCIES";
    pub const CONNECTIVITY: &str = "CONNECTIVITY";
    pub const CONTAINS: &str = "CONTAINS";
    pub const PART_OF: &str = "PART_OF";
    pub const VIEWSHEDS: &str = "VIEWSHEDS";
    pub const TEMPORAL: &str = "TEMPORAL";
    pub const LIFESPAN: &str = "LIFESPAN";
    pub const SOURCE: &str = "SOURCE";
    pub const CONFIDENCE: &str = "CONFIDENCE";
    pub const UPDATED: &str = "UPDATED";
    pub const BUILT_FORM: &str = "BUILT_FORM";
    pub const ECOLOGY: &str = "ECOLOGY";
    pub const INFRASTRUCTURE: &str = "INFRASTRUCTURE";
    pub const DEMOGRAPHICS: &str = "DEMOGRAPHICS";
    pub const ECONOMY: &str = "ECONOMY";
    pub const VISUAL: &str = "VISUAL";
    pub const HISTORY: &str = "HISTORY";
    pub const VERTICAL_PROFILE: &str = "VERTICAL_PROFILE";

    pub const RECOGNIZED: &[&str] = &[
        PLACE,
        TYPE,
        ID,
        LOCATION,
        BOUNDARY,
        EXTENT,
        ELEVATION,
        AREA,
        PURPOSE,
        EXPERIENCE,
        CHARACTER,
        ADJACENCIES,
        CONNECTIVITY,
        CONTAINS,
        PART_OF,
        VIEWSHEDS,
        TEMPORAL,
        LIFESPAN,
        SOURCE,
        CONFIDENCE,
        UPDATED,
        BUILT_FORM,
        ECOLOGY,
        INFRASTRUCTURE,
        DEMOGRAPHICS,
        ECONOMY,
        VISUAL,
        HISTORY,
        VERTICAL_PROFILE,
    ];

    /// Returns `true` if `key` maps onto a typed field of [`Place`](crate::Place).
    #[must_use]
    pub fn is_recognized(key: &str) -> bool {
        RECOGNIZED.contains(&key)
    }
}

/// Free-text mapping used by every mapping-shaped field. Keys are kept sorted
/// so equal places always render the same text.
pub type TextMap = BTreeMap<String, String>;

/// A WGS84 coordinate pair in degrees.
///
/// The range invariants (latitude within ±90, longitude within ±180) are
/// checked by the [validator](crate::validate), not on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Coordinate { lat, lon }
    }

    /// Returns `[lon, lat]`, the GeoJSON position order.
    #[must_use]
    pub fn to_position(&self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.lat, self.lon)
    }
}

/// Parses `lat, lon`.
///
/// # Examples
///
/// ```rust
/// use geon::Coordinate;
///
/// let c: Coordinate = "51.5, -0.1".parse().unwrap();
/// assert_eq!(c, Coordinate::new(51.5, -0.1));
/// assert!("51.5".parse::<Coordinate>().is_err());
/// ```
impl FromStr for Coordinate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_numbers::<2>(s) {
            Some([lat, lon]) => Ok(Coordinate { lat, lon }),
            None => Err(Error::numeric_format("coordinate", s, "`lat, lon`")),
        }
    }
}

/// An axis-aligned bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}",
            self.north, self.south, self.east, self.west
        )
    }
}

/// Parses `north, south, east, west`.
impl FromStr for Extent {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_numbers::<4>(s) {
            Some([north, south, east, west]) => Ok(Extent {
                north,
                south,
                east,
                west,
            }),
            None => Err(Error::numeric_format(
                "extent",
                s,
                "`north, south, east, west`",
            )),
        }
    }
}

/// Splits on commas and parses exactly `N` finite numbers.
fn parse_numbers<const N: usize>(s: &str) -> Option<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = s.split(',');
    for slot in out.iter_mut() {
        let n: f64 = parts.next()?.trim().parse().ok()?;
        if !n.is_finite() {
            return None;
        }
        *slot = n;
    }
    match parts.next() {
        Some(_) => None,
        None => Some(out),
    }
}

/// What can be seen from a place. Documents use either shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Viewsheds {
    List(Vec<String>),
    Map(TextMap),
}

impl Viewsheds {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Viewsheds::List(items) => items.is_empty(),
            Viewsheds::Map(map) => map.is_empty(),
        }
    }
}

/// A described place, possibly containing other places.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    // Identity
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    // Geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub boundary: Vec<Coordinate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    // Semantic
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub purpose: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub experience: TextMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub character: Vec<String>,

    // Relational
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjacencies: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub connectivity: TextMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contains: Vec<Place>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_of: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewsheds: Option<Viewsheds>,

    // Temporal
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub temporal: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub lifespan: TextMap,

    // Provenance
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub confidence: TextMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,

    // Extended domain blocks
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub built_form: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub ecology: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub infrastructure: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub demographics: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub economy: TextMap,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub visual: TextMap,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<TextMap>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub vertical_profile: TextMap,

    /// Keys the schema does not recognize, with their parsed structure.
    #[serde(skip_serializing_if = "GeonMap::is_empty")]
    pub extensions: GeonMap,
}

impl Place {
    /// Creates a place with only its identity set.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Place {
            name: name.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    /// Sets the representative point.
    #[must_use]
    pub fn with_location(mut self, lat: f64, lon: f64) -> Self {
        self.location = Some(Coordinate::new(lat, lon));
        self
    }

    /// The six free-text domain blocks, keyed by their notation key, in
    /// emission order.
    #[must_use]
    pub fn domain_blocks(&self) -> [(&'static str, &TextMap); 6] {
        [
            (keys::BUILT_FORM, &self.built_form),
            (keys::ECOLOGY, &self.ecology),
            (keys::INFRASTRUCTURE, &self.infrastructure),
            (keys::DEMOGRAPHICS, &self.demographics),
            (keys::ECONOMY, &self.economy),
            (keys::VISUAL, &self.visual),
        ]
    }

    /// Mutable access to a domain block by notation key.
    pub fn domain_block_mut(&mut self, key: &str) -> Option<&mut TextMap> {
        match key {
            keys::BUILT_FORM => Some(&mut self.built_form),
            keys::ECOLOGY => Some(&mut self.ecology),
            keys::INFRASTRUCTURE => Some(&mut self.infrastructure),
            keys::DEMOGRAPHICS => Some(&mut self.demographics),
            keys::ECONOMY => Some(&mut self.economy),
            keys::VISUAL => Some(&mut self.visual),
            _ => None,
        }
    }

    /// Number of places in this subtree, this one included.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self.contains.iter().map(Place::subtree_len).sum::<usize>()
    }

    /// Depth of the `contains` tree below this place; a leaf has depth 0.
    #[must_use]
    pub fn nesting_depth(&self) -> usize {
        self.contains
            .iter()
            .map(|child| child.nesting_depth() + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_display_roundtrip() {
        let c = Coordinate::new(52.9548, -1.1581);
        assert_eq!(c.to_string(), "52.9548, -1.1581");
        assert_eq!(c.to_string().parse::<Coordinate>().unwrap(), c);

        // Whole numbers print without a fraction and still parse back
        let c = Coordinate::new(10.0, -20.0);
        assert_eq!(c.to_string(), "10, -20");
        assert_eq!("10, -20".parse::<Coordinate>().unwrap(), c);
    }

    #[test]
    fn test_coordinate_rejects_malformed() {
        assert!("".parse::<Coordinate>().is_err());
        assert!("1, 2, 3".parse::<Coordinate>().is_err());
        assert!("north, west".parse::<Coordinate>().is_err());
        assert!("NaN, 0".parse::<Coordinate>().is_err());
        assert!("inf, 0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_extent_parse() {
        let e: Extent = "52.96, 52.95, -1.14, -1.16".parse().unwrap();
        assert_eq!(e.north, 52.96);
        assert_eq!(e.west, -1.16);
        assert_eq!(e.to_string(), "52.96, 52.95, -1.14, -1.16");
        assert!("1, 2, 3".parse::<Extent>().is_err());
    }

    #[test]
    fn test_keys() {
        assert!(keys::is_recognized("PLACE"));
        assert!(keys::is_recognized("VERTICAL_PROFILE"));
        assert!(!keys::is_recognized("place"));
        assert!(!keys::is_recognized("CUSTOM_FIELD"));
        assert_eq!(keys::RECOGNIZED.len(), 29);
    }

    #[test]
    fn test_tree_metrics() {
        let mut root = Place::new("City", "district");
        let mut quarter = Place::new("Lace Market", "district");
        quarter.contains.push(Place::new("Hall", "building"));
        root.contains.push(quarter);
        root.contains.push(Place::new("Castle", "landmark"));

        assert_eq!(root.subtree_len(), 4);
        assert_eq!(root.nesting_depth(), 2);
    }

    #[test]
    fn test_domain_block_mut() {
        let mut p = Place::default();
        p.domain_block_mut("ECOLOGY")
            .unwrap()
            .insert("canopy".to_string(), "dense".to_string());
        assert_eq!(p.ecology.get("canopy").map(String::as_str), Some("dense"));
        assert!(p.domain_block_mut("HISTORY").is_none());
    }
}
