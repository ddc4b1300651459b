//! Projection of the generic tree onto [`Place`].
//!
//! Every recognized key has one extraction rule. The rules never fail: a
//! value of the wrong shape is coerced or dropped and a [`Diagnostic`] says
//! which. Keys outside the schema are moved into
//! [`Place::extensions`] untouched.

use crate::de::ITEM_VALUE_KEY;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer::split_key;
use crate::model::{keys, TextMap, Viewsheds};
use crate::{GeonMap, Place, Value};
use std::str::FromStr;

/// Maps a parsed root mapping to a place, returning field-level diagnostics.
///
/// # Examples
///
/// ```rust
/// use geon::{mapper::map_place, parse_value};
///
/// let tree = parse_value("PLACE: Quay\nTYPE: waterfront\nMOORINGS: 12").unwrap();
/// let (place, diagnostics) = map_place(tree.as_map().unwrap().clone());
/// assert_eq!(place.name, "Quay");
/// assert!(place.extensions.contains_key("MOORINGS"));
/// assert!(diagnostics.is_empty());
/// ```
#[must_use]
pub fn map_place(root: GeonMap) -> (Place, Vec<Diagnostic>) {
    let mut mapper = EntityMapper::default();
    let place = mapper.place(root, "");
    (place, mapper.diagnostics)
}

#[derive(Default)]
struct EntityMapper {
    diagnostics: Vec<Diagnostic>,
}

impl EntityMapper {
    fn note(&mut self, kind: DiagnosticKind, message: String) {
        self.diagnostics.push(Diagnostic::for_field(kind, message));
    }

    fn place(&mut self, root: GeonMap, prefix: &str) -> Place {
        let mut place = Place::default();

        for (key, value) in root {
            let field = format!("{}{}", prefix, key);
            match key.as_str() {
                keys::PLACE => place.name = self.text(&field, value),
                keys::TYPE => place.category = self.text(&field, value),
                keys::ID => place.id = self.optional_text(&field, value),
                keys::LOCATION => place.location = self.number_list(&field, value),
                keys::BOUNDARY => {
                    place.boundary = self
                        .texts(&field, value)
                        .into_iter()
                        .enumerate()
                        .filter_map(|(i, text)| {
                            self.parse_numbers(&format!("{}[{}]", field, i), &text)
                        })
                        .collect();
                }
                keys::EXTENT => place.extent = self.number_list(&field, value),
                keys::ELEVATION => place.elevation = self.optional_text(&field, value),
                keys::AREA => place.area = self.optional_text(&field, value),
                keys::PURPOSE => place.purpose = self.texts(&field, value),
                keys::EXPERIENCE => place.experience = self.text_map(&field, value),
                keys::CHARACTER => place.character = self.texts(&field, value),
                keys::ADJACENCIES => place.adjacencies = self.texts(&field, value),
                keys::CONNECTIVITY => place.connectivity = self.text_map(&field, value),
                keys::CONTAINS => place.contains = self.children(&field, value),
                keys::PART_OF => place.part_of = self.optional_text(&field, value),
                keys::VIEWSHEDS => place.viewsheds = Some(self.viewsheds(&field, value)),
                keys::TEMPORAL => place.temporal = self.text_map(&field, value),
                keys::LIFESPAN => place.lifespan = self.text_map(&field, value),
                keys::SOURCE => place.source = self.texts(&field, value),
                keys::CONFIDENCE => place.confidence = self.text_map(&field, value),
                keys::UPDATED => place.updated = self.optional_text(&field, value),
                keys::HISTORY => place.history = self.history(&field, value),
                keys::VERTICAL_PROFILE => {
                    place.vertical_profile = self.text_map(&field, value);
                }
                _ => match place.domain_block_mut(&key) {
                    Some(block) => *block = self.text_map(&field, value),
                    None => {
                        place.extensions.insert(key, value);
                    }
                },
            }
        }

        place
    }

    /// Text of a field that must be a scalar.
    fn text(&mut self, field: &str, value: Value) -> String {
        match value {
            Value::Scalar(text) => text,
            Value::List(items) if items.is_empty() => String::new(),
            Value::List(mut items) if items.len() == 1 && items[0].is_scalar() => {
                items.pop().map(|item| item.to_string()).unwrap_or_default()
            }
            other => {
                let text = other.to_string();
                self.note(
                    DiagnosticKind::Coercion,
                    format!("{}: structured value flattened to {:?}", field, text),
                );
                text
            }
        }
    }

    fn optional_text(&mut self, field: &str, value: Value) -> Option<String> {
        let text = self.text(field, value);
        (!text.is_empty()).then_some(text)
    }

    fn texts(&mut self, field: &str, value: Value) -> Vec<String> {
        match value {
            Value::Scalar(text) => vec![text],
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.text(&format!("{}[{}]", field, i), item))
                .collect(),
            Value::Map(map) => {
                self.note(
                    DiagnosticKind::Coercion,
                    format!("{}: mapping read as a list of `key: value` entries", field),
                );
                map.into_iter()
                    .map(|(key, value)| Value::Map(GeonMap::from_iter([(key, value)])).to_string())
                    .collect()
            }
        }
    }

    /// Free-text mapping, flattening single-element lists.
    fn text_map(&mut self, field: &str, value: Value) -> TextMap {
        let mut map = TextMap::new();
        match value {
            Value::Map(entries) => {
                for (key, value) in entries {
                    let text = self.text(&format!("{}.{}", field, key), value);
                    map.insert(key, text);
                }
            }
            Value::List(items) => {
                for (i, item) in items.into_iter().enumerate() {
                    let item_field = format!("{}[{}]", field, i);
                    match item {
                        Value::Map(entries) => {
                            map.append(&mut self.text_map(&item_field, Value::Map(entries)));
                        }
                        Value::Scalar(text) => self.entry_from_text(&item_field, &text, &mut map),
                        Value::List(_) => self.note(
                            DiagnosticKind::Coercion,
                            format!("{}: nested list dropped where a mapping was expected", item_field),
                        ),
                    }
                }
            }
            Value::Scalar(text) => self.entry_from_text(field, &text, &mut map),
        }
        map
    }

    fn entry_from_text(&mut self, field: &str, text: &str, map: &mut TextMap) {
        match split_key(text) {
            Some((key, value)) => {
                map.insert(key.to_string(), value.to_string());
            }
            None => self.note(
                DiagnosticKind::Coercion,
                format!("{}: text {:?} dropped where a mapping was expected", field, text),
            ),
        }
    }

    fn number_list<T>(&mut self, field: &str, value: Value) -> Option<T>
    where
        T: FromStr<Err = crate::Error>,
    {
        let text = self.text(field, value);
        if text.is_empty() {
            return None;
        }
        self.parse_numbers(field, &text)
    }

    fn parse_numbers<T>(&mut self, field: &str, text: &str) -> Option<T>
    where
        T: FromStr<Err = crate::Error>,
    {
        match text.parse() {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                self.note(DiagnosticKind::NumericFormat, format!("{}: {}", field, err));
                None
            }
        }
    }

    /// A `VIEWSHEDS` key is always `Some`, even as a bare header.
    fn viewsheds(&mut self, field: &str, value: Value) -> Viewsheds {
        match value {
            Value::Map(entries) => Viewsheds::Map(self.text_map(field, Value::Map(entries))),
            other => Viewsheds::List(self.texts(field, other)),
        }
    }

    fn history(&mut self, field: &str, value: Value) -> Vec<TextMap> {
        let items = match value {
            Value::List(items) => items,
            single => vec![single],
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let item_field = format!("{}[{}]", field, i);
                let entry = match item {
                    Value::Scalar(text) => match split_key(&text) {
                        Some((key, value)) => {
                            TextMap::from([(key.to_string(), value.to_string())])
                        }
                        None => TextMap::from([(ITEM_VALUE_KEY.to_string(), text)]),
                    },
                    other => self.text_map(&item_field, other),
                };
                (!entry.is_empty()).then_some(entry)
            })
            .collect()
    }

    fn children(&mut self, field: &str, value: Value) -> Vec<Place> {
        let items = match value {
            Value::List(items) => items,
            single => vec![single],
        };

        let mut children = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            let prefix = format!("{}[{}].", field, i);
            match item {
                Value::Map(mut map) => {
                    if !map.contains_key(keys::PLACE) {
                        if let Some(name) = map.remove(ITEM_VALUE_KEY) {
                            map = std::iter::once((keys::PLACE.to_string(), name))
                                .chain(map)
                                .collect();
                        }
                    }
                    children.push(self.place(map, &prefix));
                }
                Value::Scalar(name) => children.push(Place::new(name, "")),
                Value::List(_) => self.note(
                    DiagnosticKind::Coercion,
                    format!("{}[{}]: nested list is not a place; dropped", field, i),
                ),
            }
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_value, Coordinate};

    fn map(text: &str) -> (Place, Vec<Diagnostic>) {
        let tree = parse_value(text).unwrap();
        map_place(tree.as_map().cloned().unwrap_or_default())
    }

    #[test]
    fn test_identity_and_geometry() {
        let (place, diagnostics) = map(
            "PLACE: Weir\nTYPE: infrastructure\nID: W-1\nLOCATION: 52.94, -1.13\nEXTENT: 1, 0, 1, 0\nBOUNDARY:\n  - 0, 0\n  - 0, 1\n  - 1, 1\n  - 0, 0",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(place.name, "Weir");
        assert_eq!(place.id.as_deref(), Some("W-1"));
        assert_eq!(place.location, Some(Coordinate::new(52.94, -1.13)));
        assert_eq!(place.extent.map(|e| e.north), Some(1.0));
        assert_eq!(place.boundary.len(), 4);
    }

    #[test]
    fn test_malformed_numbers_are_dropped() {
        let (place, diagnostics) =
            map("PLACE: x\nLOCATION: 91.0\nEXTENT: a, b, c, d\nBOUNDARY:\n  - 1, 2\n  - oops");
        assert!(place.location.is_none());
        assert!(place.extent.is_none());
        assert_eq!(place.boundary, vec![Coordinate::new(1.0, 2.0)]);
        assert_eq!(diagnostics.len(), 3);
        assert!(diagnostics
            .iter()
            .all(|d| d.kind == DiagnosticKind::NumericFormat));
        assert!(diagnostics[2].message.starts_with("BOUNDARY[1]:"));
    }

    #[test]
    fn test_lists_and_maps() {
        let (place, diagnostics) = map(
            "PURPOSE: retail\nCHARACTER:\n  - busy\n  - narrow\nTEMPORAL:\n  peak:\n    - evenings\n  quiet: dawn\nECOLOGY:\n  canopy: sparse",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(place.purpose, vec!["retail"]);
        assert_eq!(place.character, vec!["busy", "narrow"]);
        assert_eq!(place.temporal.get("peak").map(String::as_str), Some("evenings"));
        assert_eq!(place.ecology.get("canopy").map(String::as_str), Some("sparse"));
    }

    #[test]
    fn test_structured_text_is_coerced() {
        let (place, diagnostics) = map("CONNECTIVITY:\n  bus:\n    - 12\n    - 40");
        assert_eq!(place.connectivity.get("bus").map(String::as_str), Some("12, 40"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::Coercion);
        assert!(diagnostics[0].message.starts_with("CONNECTIVITY.bus:"));
    }

    #[test]
    fn test_history_entries() {
        let (place, _) = map(
            "HISTORY:\n  - year: 1840\n      event: built\n  - year: 1902\n  - Fire damage",
        );
        assert_eq!(place.history.len(), 3);
        assert_eq!(place.history[0].get("event").map(String::as_str), Some("built"));
        assert_eq!(place.history[1], TextMap::from([("year".to_string(), "1902".to_string())]));
        assert_eq!(
            place.history[2].get(ITEM_VALUE_KEY).map(String::as_str),
            Some("Fire damage")
        );
    }

    #[test]
    fn test_viewsheds_either_shape() {
        let (place, _) = map("VIEWSHEDS:\n  - castle\n  - river");
        assert_eq!(
            place.viewsheds,
            Some(Viewsheds::List(vec!["castle".to_string(), "river".to_string()]))
        );
        let (place, _) = map("VIEWSHEDS:\n  north: hills");
        assert!(matches!(place.viewsheds, Some(Viewsheds::Map(_))));
        let (place, _) = map("VIEWSHEDS:");
        assert_eq!(place.viewsheds, Some(Viewsheds::List(vec![])));
        let (place, _) = map("PLACE: x");
        assert!(place.viewsheds.is_none());
    }

    #[test]
    fn test_children() {
        let text = "\
PLACE: Park
CONTAINS:
  - PLACE: Lake
      TYPE: water
      LOCATION: bad
  - Kiosk
  - Pavilion
      TYPE: building
";
        let (place, diagnostics) = map(text);
        assert_eq!(place.contains.len(), 3);
        assert_eq!(place.contains[0].category, "water");
        assert_eq!(place.contains[1], Place::new("Kiosk", ""));
        assert_eq!(place.contains[2].name, "Pavilion");
        assert_eq!(place.contains[2].category, "building");
        assert!(place.contains[2].extensions.is_empty());

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("CONTAINS[0].LOCATION:"));
    }

    #[test]
    fn test_unknown_keys_become_extensions() {
        let (place, _) = map("PLACE: x\nCUSTOM_FIELD: hello\nSURVEY:\n  by: team\nTAGS:\n  - a");
        let keys: Vec<_> = place.extensions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["CUSTOM_FIELD", "SURVEY", "TAGS"]);
        assert_eq!(
            place.extensions.get("CUSTOM_FIELD"),
            Some(&Value::Scalar("hello".to_string()))
        );
    }
}
