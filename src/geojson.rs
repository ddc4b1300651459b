//! Conversion between places and GeoJSON.
//!
//! A [`Place`] becomes a GeoJSON Feature whose geometry is the place's
//! boundary polygon (or its point location) and whose properties carry every
//! descriptive field by snake-case name. The reverse direction reads a
//! Feature or FeatureCollection, such as an OpenStreetMap export, and infers
//! what it can: a name, a category from common tag values, a representative
//! point, and purposes.
//!
//! ## Examples
//!
//! ```rust
//! use geon::geojson::{from_feature, to_geojson};
//! use geon::Place;
//!
//! let mut place = Place::new("Bandstand", "landmark").with_location(52.95, -1.15);
//! place.purpose = vec!["music".to_string()];
//!
//! let feature = to_geojson(&place);
//! assert_eq!(feature["geometry"]["type"], "Point");
//! assert_eq!(feature["properties"]["geon_type"], "landmark");
//!
//! let back = from_feature(&feature).unwrap();
//! assert_eq!(back.name, "Bandstand");
//! assert_eq!(back.location, place.location);
//! ```

use crate::model::{Extent, TextMap, Viewsheds};
use crate::{Coordinate, Error, GeonMap, Place, Result, Value};
use serde_json::{json, Map, Value as JsonValue};

/// Source entry appended to every place read from GeoJSON.
pub const CONVERSION_SOURCE: &str = "GeoJSON conversion";

/// Category used when no tag matches.
pub const DEFAULT_CATEGORY: &str = "hybrid";

/// Name used when a feature has none.
pub const DEFAULT_NAME: &str = "Unnamed";

const NAME_PROPERTIES: &[&str] = &["name", "name:en", "official_name", "alt_name", "title", "label"];

const TAG_PROPERTIES: &[&str] = &[
    "type", "building", "highway", "railway", "leisure", "amenity", "natural", "landuse", "tourism",
    "man_made", "waterway",
];

/// Property names that map onto typed fields and are not copied into the
/// extension bag.
const TYPED_PROPERTIES: &[&str] = &[
    "geon_type",
    "id",
    "@id",
    "elevation",
    "area",
    "extent",
    "purpose",
    "experience",
    "character",
    "adjacencies",
    "connectivity",
    "contains",
    "part_of",
    "viewsheds",
    "temporal",
    "lifespan",
    "source",
    "confidence",
    "updated",
    "built_form",
    "ecology",
    "infrastructure",
    "demographics",
    "economy",
    "visual",
    "history",
    "vertical_profile",
];

/// Maps a common OpenStreetMap-style tag value to a GEON category.
#[must_use]
pub fn category_for_tag(tag: &str) -> Option<&'static str> {
    let category = match tag {
        "park" | "garden" | "playground" | "plaza" | "square" | "common" | "pitch"
        | "marketplace" => "public_space",
        "road" | "residential" | "primary" | "secondary" | "tertiary" | "footway"
        | "cycleway" | "path" | "pedestrian" | "motorway" | "trunk" => "street",
        "railway_station" | "station" | "bus_station" | "airport" | "halt"
        | "ferry_terminal" => "transport_hub",
        "yes" | "house" | "apartments" | "commercial" | "retail" | "industrial" | "office"
        | "church" | "cathedral" | "school" | "hospital" | "university" => "building",
        "monument" | "memorial" | "statue" | "tower" => "landmark",
        "bridge" => "threshold",
        "river" | "stream" | "lake" | "wood" | "forest" | "peak" | "cliff" | "beach"
        | "wetland" => "natural_feature",
        _ => return None,
    };
    Some(category)
}

// ---------------------------------------------------------------------------
// Place -> GeoJSON
// ---------------------------------------------------------------------------

/// Converts a place into a GeoJSON Feature.
///
/// The geometry is a Polygon when the boundary has at least three points
/// (closed if the boundary is open), else a Point from the location, else
/// `null`.
#[must_use]
pub fn to_geojson(place: &Place) -> JsonValue {
    let mut feature = Map::new();
    feature.insert("type".to_string(), json!("Feature"));
    if let Some(id) = &place.id {
        feature.insert("id".to_string(), json!(id));
    }
    feature.insert("geometry".to_string(), geometry(place));
    feature.insert("properties".to_string(), JsonValue::Object(properties(place)));
    JsonValue::Object(feature)
}

/// Converts places into a GeoJSON FeatureCollection.
#[must_use]
pub fn to_geojson_collection(places: &[Place]) -> JsonValue {
    json!({
        "type": "FeatureCollection",
        "features": places.iter().map(to_geojson).collect::<Vec<_>>(),
    })
}

/// Pretty-printed GeoJSON text for one place.
pub fn to_geojson_string(place: &Place) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_geojson(place))?)
}

fn geometry(place: &Place) -> JsonValue {
    if place.boundary.len() >= 3 {
        let mut ring: Vec<[f64; 2]> = place.boundary.iter().map(Coordinate::to_position).collect();
        if place.boundary.first() != place.boundary.last() {
            ring.push(place.boundary[0].to_position());
        }
        json!({ "type": "Polygon", "coordinates": [ring] })
    } else if let Some(location) = &place.location {
        json!({ "type": "Point", "coordinates": location.to_position() })
    } else {
        JsonValue::Null
    }
}

fn properties(place: &Place) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert("name".to_string(), json!(place.name));
    props.insert("geon_type".to_string(), json!(place.category));

    let mut text = |key: &str, value: &Option<String>| {
        if let Some(value) = value {
            props.insert(key.to_string(), json!(value));
        }
    };
    text("id", &place.id);
    text("elevation", &place.elevation);
    text("area", &place.area);
    text("part_of", &place.part_of);
    text("updated", &place.updated);

    if let Some(extent) = &place.extent {
        props.insert(
            "extent".to_string(),
            json!({
                "north": extent.north,
                "south": extent.south,
                "east": extent.east,
                "west": extent.west,
            }),
        );
    }

    for (key, list) in [
        ("purpose", &place.purpose),
        ("character", &place.character),
        ("adjacencies", &place.adjacencies),
        ("source", &place.source),
    ] {
        if !list.is_empty() {
            props.insert(key.to_string(), json!(list));
        }
    }

    if !place.contains.is_empty() {
        let names: Vec<&str> = place.contains.iter().map(|c| c.name.as_str()).collect();
        props.insert("contains".to_string(), json!(names));
    }

    match &place.viewsheds {
        Some(Viewsheds::List(items)) => {
            props.insert("viewsheds".to_string(), json!(items));
        }
        Some(Viewsheds::Map(map)) => {
            props.insert("viewsheds".to_string(), text_map_json(map));
        }
        None => {}
    }

    for (key, map) in [
        ("experience", &place.experience),
        ("connectivity", &place.connectivity),
        ("temporal", &place.temporal),
        ("lifespan", &place.lifespan),
        ("confidence", &place.confidence),
        ("built_form", &place.built_form),
        ("ecology", &place.ecology),
        ("infrastructure", &place.infrastructure),
        ("demographics", &place.demographics),
        ("economy", &place.economy),
        ("visual", &place.visual),
        ("vertical_profile", &place.vertical_profile),
    ] {
        if !map.is_empty() {
            props.insert(key.to_string(), text_map_json(map));
        }
    }

    if !place.history.is_empty() {
        let entries: Vec<JsonValue> = place.history.iter().map(text_map_json).collect();
        props.insert("history".to_string(), JsonValue::Array(entries));
    }

    for (key, value) in &place.extensions {
        if props.contains_key(key) {
            log::debug!("extension `{}` collides with a GeoJSON property; not exported", key);
            continue;
        }
        props.insert(key.clone(), value_json(value));
    }

    props
}

fn text_map_json(map: &TextMap) -> JsonValue {
    JsonValue::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), JsonValue::String(v.clone())))
            .collect(),
    )
}

fn value_json(value: &Value) -> JsonValue {
    match value {
        Value::Scalar(text) => JsonValue::String(text.clone()),
        Value::List(items) => JsonValue::Array(items.iter().map(value_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_json(v)))
                .collect(),
        ),
    }
}

// ---------------------------------------------------------------------------
// GeoJSON -> Place
// ---------------------------------------------------------------------------

/// Reads a Feature or FeatureCollection.
///
/// The outer `Result` fails only when the document is neither; each feature
/// then converts (or fails) on its own.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
///
/// let collection = json!({
///     "type": "FeatureCollection",
///     "features": [
///         { "type": "Feature", "geometry": { "type": "Point", "coordinates": [-1.15, 52.95] },
///           "properties": { "name": "Market", "amenity": "marketplace" } },
///         { "type": "Feature", "geometry": { "type": "Circle", "coordinates": [] },
///           "properties": {} }
///     ]
/// });
///
/// let places = geon::geojson::from_geojson(&collection).unwrap();
/// assert_eq!(places[0].as_ref().unwrap().category, "public_space");
/// assert!(places[1].is_err());
/// ```
pub fn from_geojson(value: &JsonValue) -> Result<Vec<Result<Place>>> {
    match value.get("type").and_then(JsonValue::as_str) {
        Some("FeatureCollection") => {
            let features: &[JsonValue] = match value.get("features") {
                Some(JsonValue::Array(features)) => features.as_slice(),
                None | Some(JsonValue::Null) => &[],
                Some(_) => {
                    return Err(Error::invalid_geojson("`features` is not an array"));
                }
            };
            let places: Vec<Result<Place>> = features.iter().map(from_feature).collect();
            log::debug!(
                "read {} of {} features",
                places.iter().filter(|p| p.is_ok()).count(),
                places.len()
            );
            Ok(places)
        }
        Some("Feature") => Ok(vec![from_feature(value)]),
        Some(other) => Err(Error::invalid_geojson(&format!(
            "expected a Feature or FeatureCollection, found {:?}",
            other
        ))),
        None => Err(Error::invalid_geojson("missing `type`")),
    }
}

/// Parses GeoJSON text, then reads it with [`from_geojson`].
pub fn from_geojson_str(text: &str) -> Result<Vec<Result<Place>>> {
    let value: JsonValue = serde_json::from_str(text)?;
    from_geojson(&value)
}

/// Converts one Feature into a place.
pub fn from_feature(feature: &JsonValue) -> Result<Place> {
    let Some(object) = feature.as_object() else {
        return Err(Error::invalid_geojson("feature is not an object"));
    };
    if let Some(kind) = object.get("type").and_then(JsonValue::as_str) {
        if kind != "Feature" {
            return Err(Error::invalid_geojson(&format!("expected a Feature, found {:?}", kind)));
        }
    }

    let empty = Map::new();
    let props = object
        .get("properties")
        .and_then(JsonValue::as_object)
        .unwrap_or(&empty);

    let mut place = Place::new(infer_name(props), infer_category(props));

    match object.get("geometry") {
        None | Some(JsonValue::Null) => {}
        Some(geometry) => {
            let (location, boundary) = read_geometry(geometry)?;
            place.location = Some(location);
            place.boundary = boundary;
        }
    }

    place.id = object
        .get("id")
        .or_else(|| props.get("id"))
        .or_else(|| props.get("@id"))
        .and_then(json_text);

    place.purpose = match props.get("purpose") {
        Some(purpose) => json_texts(purpose),
        None => inferred_purposes(props),
    };

    place.elevation = props.get("elevation").and_then(json_text);
    place.area = props.get("area").and_then(json_text);
    place.part_of = props.get("part_of").and_then(json_text);
    place.updated = props.get("updated").and_then(json_text);
    place.extent = props.get("extent").and_then(read_extent);

    place.character = props.get("character").map(json_texts).unwrap_or_default();
    place.adjacencies = props.get("adjacencies").map(json_texts).unwrap_or_default();
    place.source = props.get("source").map(json_texts).unwrap_or_default();
    place.source.push(CONVERSION_SOURCE.to_string());

    place.contains = props
        .get("contains")
        .map(json_texts)
        .unwrap_or_default()
        .into_iter()
        .map(|name| Place::new(name, ""))
        .collect();

    place.viewsheds = match props.get("viewsheds") {
        Some(JsonValue::Object(map)) => Some(Viewsheds::Map(json_text_map(map))),
        Some(JsonValue::Null) | None => None,
        Some(other) => Some(Viewsheds::List(json_texts(other))),
    };

    let text_map = |key: &str| {
        props
            .get(key)
            .and_then(JsonValue::as_object)
            .map(json_text_map)
            .unwrap_or_default()
    };
    place.experience = text_map("experience");
    place.connectivity = text_map("connectivity");
    place.temporal = text_map("temporal");
    place.lifespan = text_map("lifespan");
    place.confidence = text_map("confidence");
    place.built_form = text_map("built_form");
    place.ecology = text_map("ecology");
    place.infrastructure = text_map("infrastructure");
    place.demographics = text_map("demographics");
    place.economy = text_map("economy");
    place.visual = text_map("visual");
    place.vertical_profile = text_map("vertical_profile");

    if let Some(JsonValue::Array(entries)) = props.get("history") {
        place.history = entries
            .iter()
            .filter_map(JsonValue::as_object)
            .map(json_text_map)
            .filter(|entry| !entry.is_empty())
            .collect();
    }

    place.extensions = props
        .iter()
        .filter(|(key, _)| key.as_str() != "name" && !TYPED_PROPERTIES.contains(&key.as_str()))
        .filter_map(|(key, value)| json_value(value).map(|v| (key.clone(), v)))
        .collect::<GeonMap>();

    Ok(place)
}

fn infer_name(props: &Map<String, JsonValue>) -> String {
    NAME_PROPERTIES
        .iter()
        .filter_map(|key| props.get(*key).and_then(json_text))
        .find(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}

fn infer_category(props: &Map<String, JsonValue>) -> String {
    if let Some(category) = props.get("geon_type").and_then(json_text) {
        return category;
    }
    TAG_PROPERTIES
        .iter()
        .filter_map(|key| props.get(*key).and_then(JsonValue::as_str))
        .find_map(category_for_tag)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

fn inferred_purposes(props: &Map<String, JsonValue>) -> Vec<String> {
    let mut purposes = Vec::new();
    for key in ["amenity", "leisure"] {
        if let Some(value) = props.get(key).and_then(json_text).filter(|v| !v.is_empty()) {
            purposes.push(value);
        }
    }
    if let Some(shop) = props.get("shop").and_then(json_text).filter(|v| !v.is_empty()) {
        purposes.push(format!("retail ({})", shop));
    }
    purposes
}

/// Representative point and boundary ring of a geometry.
fn read_geometry(geometry: &JsonValue) -> Result<(Coordinate, Vec<Coordinate>)> {
    let kind = geometry
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::unsupported_geometry("geometry without a type"))?;
    let coordinates = geometry.get("coordinates").unwrap_or(&JsonValue::Null);
    let unusable = || Error::unsupported_geometry(&format!("{} coordinates yield no point", kind));

    match kind {
        "Point" => position(coordinates)
            .map(|point| (point, Vec::new()))
            .ok_or_else(unusable),
        "MultiPoint" | "LineString" => middle_vertex(coordinates)
            .map(|point| (point, Vec::new()))
            .ok_or_else(unusable),
        "MultiLineString" => first_of(coordinates)
            .and_then(middle_vertex)
            .map(|point| (point, Vec::new()))
            .ok_or_else(unusable),
        "Polygon" => first_of(coordinates)
            .and_then(ring_with_centroid)
            .ok_or_else(unusable),
        "MultiPolygon" => first_of(coordinates)
            .and_then(first_of)
            .and_then(ring_with_centroid)
            .ok_or_else(unusable),
        other => Err(Error::unsupported_geometry(other)),
    }
}

fn first_of(value: &JsonValue) -> Option<&JsonValue> {
    value.as_array()?.first()
}

/// A GeoJSON `[lon, lat, ...]` position.
fn position(value: &JsonValue) -> Option<Coordinate> {
    let pair = value.as_array()?;
    let lon = pair.first()?.as_f64()?;
    let lat = pair.get(1)?.as_f64()?;
    (lon.is_finite() && lat.is_finite()).then(|| Coordinate::new(lat, lon))
}

fn middle_vertex(value: &JsonValue) -> Option<Coordinate> {
    let points = value.as_array()?;
    position(points.get(points.len() / 2)?)
}

fn ring_with_centroid(value: &JsonValue) -> Option<(Coordinate, Vec<Coordinate>)> {
    let ring: Vec<Coordinate> = value
        .as_array()?
        .iter()
        .map(position)
        .collect::<Option<_>>()?;
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let lat = ring.iter().map(|c| c.lat).sum::<f64>() / n;
    let lon = ring.iter().map(|c| c.lon).sum::<f64>() / n;
    Some((Coordinate::new(lat, lon), ring))
}

fn read_extent(value: &JsonValue) -> Option<Extent> {
    let side = |name: &str| value.get(name).and_then(JsonValue::as_f64);
    Some(Extent {
        north: side("north")?,
        south: side("south")?,
        east: side("east")?,
        west: side("west")?,
    })
}

fn json_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_texts(value: &JsonValue) -> Vec<String> {
    match value {
        JsonValue::Array(items) => items.iter().filter_map(json_text).collect(),
        other => json_text(other).into_iter().collect(),
    }
}

fn json_text_map(map: &Map<String, JsonValue>) -> TextMap {
    map.iter()
        .filter_map(|(k, v)| {
            let text = json_text(v).or_else(|| json_value(v).map(|v| v.to_string()))?;
            Some((k.clone(), text))
        })
        .collect()
}

/// Generic tree for an arbitrary property; `null` has no GEON form.
fn json_value(value: &JsonValue) -> Option<Value> {
    match value {
        JsonValue::Null => None,
        JsonValue::Array(items) => Some(Value::List(items.iter().filter_map(json_value).collect())),
        JsonValue::Object(map) => Some(Value::Map(
            map.iter()
                .filter_map(|(k, v)| json_value(v).map(|v| (k.clone(), v)))
                .collect(),
        )),
        scalar => json_text(scalar).map(Value::Scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_table() {
        assert_eq!(category_for_tag("park"), Some("public_space"));
        assert_eq!(category_for_tag("bridge"), Some("threshold"));
        assert_eq!(category_for_tag("wetland"), Some("natural_feature"));
        assert_eq!(category_for_tag("spaceport"), None);
    }

    #[test]
    fn test_polygon_closed_on_export() {
        let mut place = Place::new("Plot", "hybrid");
        place.boundary = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        let feature = to_geojson(&place);
        let ring = feature["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], ring[3]);
    }

    #[test]
    fn test_no_geometry_is_null() {
        let feature = to_geojson(&Place::new("Somewhere", "hybrid"));
        assert!(feature["geometry"].is_null());
        let back = from_feature(&feature).unwrap();
        assert!(back.location.is_none());
    }

    #[test]
    fn test_centroids() {
        let line = json!({ "type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 2.0], [3.0, 4.0]] });
        assert_eq!(read_geometry(&line).unwrap().0, Coordinate::new(2.0, 1.0));

        let polygon = json!({ "type": "Polygon", "coordinates": [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]] });
        let (centroid, ring) = read_geometry(&polygon).unwrap();
        assert_eq!(centroid, Coordinate::new(1.0, 1.0));
        assert_eq!(ring.len(), 4);

        let multi = json!({ "type": "MultiLineString", "coordinates": [[[5.0, 6.0]], [[9.0, 9.0]]] });
        assert_eq!(read_geometry(&multi).unwrap().0, Coordinate::new(6.0, 5.0));
    }

    #[test]
    fn test_unsupported_geometry() {
        let circle = json!({ "type": "GeometryCollection", "geometries": [] });
        assert!(matches!(read_geometry(&circle), Err(Error::UnsupportedGeometry(_))));

        let empty = json!({ "type": "LineString", "coordinates": [] });
        assert!(matches!(read_geometry(&empty), Err(Error::UnsupportedGeometry(_))));
    }

    #[test]
    fn test_inference_from_tags() {
        let feature = json!({
            "type": "Feature",
            "id": 42,
            "geometry": { "type": "Point", "coordinates": [-1.0, 52.0] },
            "properties": { "official_name": "Old Mill", "building": "industrial", "shop": "bakery", "levels": 3 }
        });
        let place = from_feature(&feature).unwrap();
        assert_eq!(place.name, "Old Mill");
        assert_eq!(place.category, "building");
        assert_eq!(place.id.as_deref(), Some("42"));
        assert_eq!(place.purpose, vec!["retail (bakery)"]);
        assert_eq!(place.source, vec![CONVERSION_SOURCE]);
        assert_eq!(place.extensions.get("levels"), Some(&Value::from("3")));
    }

    #[test]
    fn test_defaults() {
        let place = from_feature(&json!({ "type": "Feature", "properties": null })).unwrap();
        assert_eq!(place.name, DEFAULT_NAME);
        assert_eq!(place.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(from_geojson(&json!([1, 2])), Err(Error::InvalidGeoJson(_))));
        assert!(matches!(
            from_geojson(&json!({ "type": "Point", "coordinates": [0, 0] })),
            Err(Error::InvalidGeoJson(_))
        ));
        assert!(matches!(from_geojson_str("{not json"), Err(Error::Json(_))));
    }
}
