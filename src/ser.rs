//! GEON generation.
//!
//! This module provides the [`Generator`] that writes a [`Place`] as GEON
//! text. It is the inverse of the block parser and the entity mapper taken
//! together.
//!
//! ## Overview
//!
//! - **Fixed field order**: identity, geometry, semantic, relational,
//!   temporal, provenance, extended blocks, then extensions. Input order
//!   never matters, so equal places always produce identical text.
//! - **Omission**: unset optional fields and empty collections write nothing.
//!   `PLACE` and `TYPE` are always written.
//! - **Inline purpose**: a single purpose prints as `PURPOSE: value`.
//! - **Nested places**: `- PLACE: name` with the child's fields two levels
//!   deeper than the marker, siblings separated by a blank line.
//!
//! ## Usage
//!
//! ```rust
//! use geon::{generate, Place};
//!
//! let mut place = Place::new("Corn Exchange", "building");
//! place.purpose = vec!["retail".to_string()];
//!
//! assert_eq!(generate(&place), "PLACE: Corn Exchange\nTYPE: building\nPURPOSE: retail\n");
//! ```
//!
//! ## Direct Generator Usage
//!
//! ```rust
//! use geon::{GenerateOptions, Generator, Place};
//!
//! let mut generator = Generator::new(GenerateOptions::new().with_indent(4));
//! generator.write_place(&Place::new("Pier", "landmark"));
//! assert_eq!(generator.into_inner(), "PLACE: Pier\nTYPE: landmark\n");
//! ```

use crate::de::ITEM_VALUE_KEY;
use crate::lexer::split_key;
use crate::model::{keys, TextMap, Viewsheds};
use crate::{GenerateOptions, GeonMap, Place, Value};
use std::borrow::Cow;
use std::fmt::Display;

/// The GEON generator.
///
/// Accumulates text for one or more places. Created via [`Generator::new`].
pub struct Generator {
    output: String,
    options: GenerateOptions,
}

impl Generator {
    pub fn new(options: GenerateOptions) -> Self {
        Generator {
            output: String::with_capacity(256),
            options,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    /// Appends a top-level document for `place`.
    pub fn write_place(&mut self, place: &Place) {
        self.entry(0, keys::PLACE, &place.name);
        self.write_fields(place, 0);
    }

    /// Writes every field except `PLACE` at `level`.
    fn write_fields(&mut self, place: &Place, level: usize) {
        // Identity
        self.entry(level, keys::TYPE, &place.category);
        self.optional(level, keys::ID, place.id.as_deref());

        // Geometry
        if let Some(location) = &place.location {
            self.entry(level, keys::LOCATION, location);
        }
        self.list(level, keys::BOUNDARY, &place.boundary);
        if let Some(extent) = &place.extent {
            self.entry(level, keys::EXTENT, extent);
        }
        self.optional(level, keys::ELEVATION, place.elevation.as_deref());
        self.optional(level, keys::AREA, place.area.as_deref());

        // Semantic
        match place.purpose.as_slice() {
            [only] if !clean(only).is_empty() => self.entry(level, keys::PURPOSE, only),
            purposes => self.list(level, keys::PURPOSE, purposes),
        }
        self.text_map(level, keys::EXPERIENCE, &place.experience);
        self.list(level, keys::CHARACTER, &place.character);

        // Relational
        self.list(level, keys::ADJACENCIES, &place.adjacencies);
        self.text_map(level, keys::CONNECTIVITY, &place.connectivity);
        self.children(level, &place.contains);
        self.optional(level, keys::PART_OF, place.part_of.as_deref());
        match &place.viewsheds {
            Some(viewsheds) if viewsheds.is_empty() => {
                self.line(level, &format!("{}:", keys::VIEWSHEDS));
            }
            Some(Viewsheds::List(items)) => self.list(level, keys::VIEWSHEDS, items),
            Some(Viewsheds::Map(map)) => self.text_map(level, keys::VIEWSHEDS, map),
            None => {}
        }

        // Temporal
        self.text_map(level, keys::TEMPORAL, &place.temporal);
        self.text_map(level, keys::LIFESPAN, &place.lifespan);

        // Provenance
        self.list(level, keys::SOURCE, &place.source);
        self.text_map(level, keys::CONFIDENCE, &place.confidence);
        self.optional(level, keys::UPDATED, place.updated.as_deref());

        // Extended
        for (key, block) in place.domain_blocks() {
            self.text_map(level, key, block);
        }
        self.history(level, &place.history);
        self.text_map(level, keys::VERTICAL_PROFILE, &place.vertical_profile);

        self.extensions(level, &place.extensions);
    }

    fn line(&mut self, level: usize, text: &str) {
        for _ in 0..level * self.options.indent {
            self.output.push(' ');
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// `KEY: value`, or a bare `KEY:` when the value is empty.
    fn entry(&mut self, level: usize, key: &str, value: impl Display) {
        let value = value.to_string();
        let value = clean(&value);
        if value.is_empty() {
            self.line(level, &format!("{}:", key));
        } else {
            self.line(level, &format!("{}: {}", key, value));
        }
    }

    fn optional(&mut self, level: usize, key: &str, value: Option<&str>) {
        if let Some(value) = value.filter(|v| !clean(v).is_empty()) {
            self.entry(level, key, value);
        }
    }

    fn dash(&mut self, level: usize, text: &str) {
        let text = clean(text);
        if text.is_empty() {
            self.line(level, "-");
        } else {
            self.line(level, &format!("- {}", text));
        }
    }

    fn list<T: Display>(&mut self, level: usize, key: &str, items: &[T]) {
        if items.is_empty() {
            return;
        }
        self.line(level, &format!("{}:", key));
        for item in items {
            self.dash(level + 1, &item.to_string());
        }
    }

    fn text_map(&mut self, level: usize, key: &str, map: &TextMap) {
        let entries: Vec<_> = map.iter().filter(|(k, _)| writable_key(k)).collect();
        if entries.is_empty() {
            return;
        }
        self.line(level, &format!("{}:", key));
        for (k, v) in entries {
            self.entry(level + 1, k, v);
        }
    }

    fn children(&mut self, level: usize, children: &[Place]) {
        if children.is_empty() {
            return;
        }
        self.line(level, &format!("{}:", keys::CONTAINS));
        for (i, child) in children.iter().enumerate() {
            if i > 0 && self.options.separate_children {
                self.output.push('\n');
            }
            let name = clean(&child.name);
            if name.is_empty() {
                self.line(level + 1, &format!("- {}:", keys::PLACE));
            } else {
                self.line(level + 1, &format!("- {}: {}", keys::PLACE, name));
            }
            self.write_fields(child, level + 3);
        }
    }

    fn history(&mut self, level: usize, entries: &[TextMap]) {
        let items: Vec<_> = entries
            .iter()
            .filter_map(|entry| {
                // `_value` leads so it can go on the dash line
                let mut item = GeonMap::with_capacity(entry.len());
                if let Some(text) = entry.get(ITEM_VALUE_KEY) {
                    item.insert(ITEM_VALUE_KEY.to_string(), Value::Scalar(text.clone()));
                }
                for (k, v) in entry {
                    if k != ITEM_VALUE_KEY && writable_key(k) {
                        item.insert(k.clone(), Value::Scalar(v.clone()));
                    }
                }
                (!item.is_empty()).then_some(Value::Map(item))
            })
            .collect();
        if items.is_empty() {
            return;
        }
        self.line(level, &format!("{}:", keys::HISTORY));
        for item in &items {
            self.item(level + 1, item);
        }
    }

    fn extensions(&mut self, level: usize, extensions: &GeonMap) {
        for (key, value) in extensions {
            if keys::is_recognized(key) {
                log::debug!("extension `{}` shadows a recognized key; not written", key);
                continue;
            }
            self.value_entry(level, key, value);
        }
    }

    /// Writes a generic `key: value` entry, recursing into containers.
    fn value_entry(&mut self, level: usize, key: &str, value: &Value) {
        if !writable_key(key) {
            return;
        }
        match value {
            Value::Scalar(text) => self.entry(level, key, text),
            Value::List(items) => {
                self.line(level, &format!("{}:", key));
                for item in items {
                    self.item(level + 1, item);
                }
            }
            Value::Map(map) => {
                self.line(level, &format!("{}:", key));
                for (k, v) in map {
                    self.value_entry(level + 1, k, v);
                }
            }
        }
    }

    /// Writes one list item at `level`.
    ///
    /// A mapping whose first entry is a scalar puts that entry on the dash
    /// line and the rest two levels deeper; anything else structured goes
    /// under a bare `-`.
    fn item(&mut self, level: usize, item: &Value) {
        match item {
            Value::Scalar(text) => self.dash(level, text),
            Value::Map(map) => match map.first() {
                Some((key, Value::Scalar(text))) if fits_dash_line(key, text) => {
                    if key == ITEM_VALUE_KEY {
                        self.dash(level, text);
                    } else {
                        self.dash(level, &format!("{}: {}", key, clean(text)));
                    }
                    for (k, v) in map.iter().skip(1) {
                        self.value_entry(level + 2, k, v);
                    }
                }
                Some(_) => {
                    self.line(level, "-");
                    for (k, v) in map {
                        self.value_entry(level + 2, k, v);
                    }
                }
                None => self.line(level, "-"),
            },
            Value::List(items) => {
                self.line(level, "-");
                for nested in items {
                    self.item(level + 2, nested);
                }
            }
        }
    }
}

/// Whether `key` reads back unchanged from a `key: value` line.
///
/// Keys that would split early, open a list item, or lose whitespace to
/// trimming are skipped.
fn writable_key(key: &str) -> bool {
    let writable = !key.is_empty()
        && key.trim() == key
        && !key.starts_with('-')
        && !key.contains(|c| matches!(c, ':' | '\n' | '\r'));
    if !writable {
        log::debug!("key {:?} cannot be written as a GEON key; skipped", key);
    }
    writable
}

/// Whether a mapping item's first entry can share the dash line.
///
/// `_value` text goes on the line bare, so it must not read as `key: value`.
fn fits_dash_line(key: &str, text: &str) -> bool {
    if key == ITEM_VALUE_KEY {
        split_key(&clean(text)).is_none()
    } else {
        writable_key(key)
    }
}

/// Folds line breaks to single spaces and trims.
fn clean(text: &str) -> Cow<'_, str> {
    if text.contains(|c| c == '\n' || c == '\r') {
        let folded: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        Cow::Owned(folded.join(" "))
    } else {
        Cow::Borrowed(text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coordinate;

    fn generate(place: &Place) -> String {
        let mut generator = Generator::new(GenerateOptions::new());
        generator.write_place(place);
        generator.into_inner()
    }

    #[test]
    fn test_identity_always_written() {
        assert_eq!(generate(&Place::default()), "PLACE:\nTYPE:\n");
    }

    #[test]
    fn test_purpose_inline_or_list() {
        let mut place = Place::new("Arcade", "building");
        place.purpose = vec!["retail".to_string()];
        assert!(generate(&place).contains("\nPURPOSE: retail\n"));

        place.purpose.push("social".to_string());
        assert!(generate(&place).contains("\nPURPOSE:\n  - retail\n  - social\n"));
    }

    #[test]
    fn test_field_order() {
        let mut place = Place::new("Quay", "waterfront");
        place.updated = Some("2024-05-01".to_string());
        place.id = Some("Q1".to_string());
        place.location = Some(Coordinate::new(1.5, 2.0));
        place
            .ecology
            .insert("birds".to_string(), "gulls".to_string());
        place
            .extensions
            .insert("ZONE".to_string(), Value::from("harbour"));

        assert_eq!(
            generate(&place),
            "PLACE: Quay\nTYPE: waterfront\nID: Q1\nLOCATION: 1.5, 2\nUPDATED: 2024-05-01\nECOLOGY:\n  birds: gulls\nZONE: harbour\n"
        );
    }

    #[test]
    fn test_children_layout() {
        let mut parent = Place::new("Park", "public_space");
        parent
            .contains
            .push(Place::new("Lake", "water").with_location(1.0, 2.0));
        parent.contains.push(Place::new("Cafe", "building"));

        let expected = "\
PLACE: Park
TYPE: public_space
CONTAINS:
  - PLACE: Lake
      TYPE: water
      LOCATION: 1, 2

  - PLACE: Cafe
      TYPE: building
";
        assert_eq!(generate(&parent), expected);
    }

    #[test]
    fn test_children_without_separator() {
        let mut parent = Place::new("P", "t");
        parent.contains.push(Place::new("A", "a"));
        parent.contains.push(Place::new("B", "b"));
        let mut generator = Generator::new(GenerateOptions::new().with_separate_children(false));
        generator.write_place(&parent);
        assert!(!generator.into_inner().contains("\n\n"));
    }

    #[test]
    fn test_history_items() {
        let mut place = Place::new("Mill", "building");
        place.history.push(TextMap::from([
            ("year".to_string(), "1840".to_string()),
            ("event".to_string(), "built".to_string()),
        ]));
        place.history.push(TextMap::from([(
            ITEM_VALUE_KEY.to_string(),
            "Converted to flats".to_string(),
        )]));

        let text = generate(&place);
        assert!(text.contains("HISTORY:\n  - event: built\n      year: 1840\n  - Converted to flats\n"));
    }

    #[test]
    fn test_extensions() {
        let mut place = Place::new("x", "y");
        let mut survey = GeonMap::new();
        survey.insert("by".to_string(), Value::from("team"));
        survey.insert(
            "notes".to_string(),
            Value::List(vec![Value::from("one"), Value::from("two")]),
        );
        place.extensions.insert("SURVEY".to_string(), Value::Map(survey));
        place.extensions.insert("EMPTY".to_string(), Value::List(vec![]));
        place.extensions.insert("TYPE".to_string(), Value::from("shadow"));

        let text = generate(&place);
        assert!(text.ends_with("SURVEY:\n  by: team\n  notes:\n    - one\n    - two\nEMPTY:\n"));
        assert_eq!(text.matches("TYPE").count(), 1);
    }

    #[test]
    fn test_structured_list_items() {
        let mut item = GeonMap::new();
        item.insert("name".to_string(), Value::from("gate"));
        item.insert("width".to_string(), Value::from("3m"));
        let mut place = Place::new("x", "y");
        place.extensions.insert(
            "FEATURES".to_string(),
            Value::List(vec![
                Value::Map(item),
                Value::List(vec![Value::from("a")]),
            ]),
        );

        let text = generate(&place);
        assert!(text.contains("FEATURES:\n  - name: gate\n      width: 3m\n  -\n      - a\n"));
    }

    #[test]
    fn test_unwritable_keys_skipped() {
        let mut place = Place::new("x", "y");
        for key in ["noise: day", "- bus", "", " padded", "pace"] {
            place.experience.insert(key.to_string(), "v".to_string());
        }
        place.confidence.insert("a:b".to_string(), "high".to_string());

        let text = generate(&place);
        assert!(text.ends_with("TYPE: y\nEXPERIENCE:\n  pace: v\n"), "{}", text);
    }

    #[test]
    fn test_item_text_with_colon_goes_under_bare_dash() {
        let mut place = Place::new("x", "y");
        place.history.push(TextMap::from([(
            ITEM_VALUE_KEY.to_string(),
            "Fire: 1902".to_string(),
        )]));
        place.history.push(TextMap::from([
            (ITEM_VALUE_KEY.to_string(), "Opened 10:30".to_string()),
            ("year".to_string(), "1911".to_string()),
        ]));

        let text = generate(&place);
        assert!(text.ends_with(
            "HISTORY:\n  -\n      _value: Fire: 1902\n  -\n      _value: Opened 10:30\n      year: 1911\n"
        ));
    }

    #[test]
    fn test_empty_viewsheds_header() {
        let mut place = Place::new("x", "y");
        place.viewsheds = Some(Viewsheds::List(Vec::new()));
        assert!(generate(&place).ends_with("TYPE: y\nVIEWSHEDS:\n"));
    }

    #[test]
    fn test_newlines_folded() {
        let mut place = Place::new("Two\nLines", "a\r\n b");
        place.part_of = Some("  \n ".to_string());
        assert_eq!(generate(&place), "PLACE: Two Lines\nTYPE: a b\n");
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("  plain  "), "plain");
        assert_eq!(clean("a\n\nb"), "a b");
    }
}
