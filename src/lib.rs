//! # geon
//!
//! A parser and generator for GEON (Geospatial Experience-Oriented Notation), an
//! indentation-structured text format for describing places.
//!
//! ## What is GEON?
//!
//! A GEON document describes one place: its identity and geometry, what it is
//! for, how it feels, what it connects to, how it changes over time, and where
//! the information came from. Places can contain other places, so a district
//! document can hold its squares, and each square its buildings.
//!
//! ```text
//! PLACE: Market Square
//! TYPE: public_space
//! LOCATION: 52.2053, 0.1218
//! PURPOSE:
//!   - commerce
//!   - gathering
//! EXPERIENCE:
//!   noise_level: moderate
//!   pace: slow
//! CONTAINS:
//!   - PLACE: Fountain
//!       TYPE: landmark
//! ```
//!
//! ## Key Features
//!
//! - **Lenient parsing**: malformed lines never fail a document; every
//!   leniency is reported as a [`Diagnostic`]
//! - **Canonical generation**: a fixed field order, so equal places always
//!   render identically and `generate(parse(generate(p))) == generate(p)`
//! - **Open schema**: unknown keys survive a round trip in [`Place::extensions`]
//! - **Bounded recursion**: nesting beyond [`ParseOptions::max_depth`] is a
//!   structured [`Error::RecursionLimit`], never a stack overflow
//! - **GeoJSON conversion** and **vocabulary validation** on the typed model
//!
//! ## Quick Start
//!
//! ```rust
//! use geon::{generate, parse, Place};
//!
//! let place = parse("PLACE: My Park\nTYPE: public_space\nLOCATION: 51.5, -0.1\n").unwrap();
//! assert_eq!(place.name, "My Park");
//! assert_eq!(place.location.map(|c| (c.lat, c.lon)), Some((51.5, -0.1)));
//!
//! let text = generate(&place);
//! assert_eq!(parse(&text).unwrap(), place);
//! ```
//!
//! ### Diagnostics
//!
//! ```rust
//! use geon::{parse_with_options, DiagnosticKind, ParseOptions};
//!
//! let text = "PLACE: Yard\nTYPE: hybrid\n      stray: line\n";
//! let parsed = parse_with_options(text, &ParseOptions::new()).unwrap();
//! assert_eq!(parsed.place.name, "Yard");
//! assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::OrphanedLine);
//! ```
//!
//! ### Dynamic Values with geon! Macro
//!
//! ```rust
//! use geon::{geon, Value};
//!
//! let hours = geon!({
//!     "weekdays": "08:00-18:00",
//!     "closed": ["Christmas Day", "Boxing Day"]
//! });
//!
//! assert_eq!(hours.as_map().and_then(|m| m.get("weekdays")), Some(&Value::from("08:00-18:00")));
//! ```
//!
//! ## Modules
//!
//! - [`lexer`]: line records with depth and content
//! - [`de`]: the block parser building the generic [`Value`] tree
//! - [`mapper`]: projection of the tree onto [`Place`]
//! - [`ser`]: the [`Generator`]
//! - [`split`]: multi-document streams
//! - [`geojson`], [`validate`], [`vocab`]: consumers of the typed model
//! - [`format`]: notes on the notation itself
//!
//! ## Demos
//!
//! See the `demos/` directory:
//!
//! - **`basic.rs`** - parse, inspect, and regenerate a document
//! - **`nested_places.rs`** - places containing places
//! - **`extensions.rs`** - unknown keys and the generic tree
//! - **`from_geojson.rs`** - GeoJSON in both directions
//! - **`validate.rs`** - validation reports
//!
//! Run any demo with: `cargo run --example <name>`

pub mod de;
pub mod error;
pub mod format;
pub mod geojson;
pub mod lexer;
mod macros;
pub mod map;
pub mod mapper;
pub mod model;
pub mod options;
pub mod ser;
pub mod split;
pub mod validate;
pub mod value;
pub mod vocab;

pub use de::BlockParser;
pub use error::{Diagnostic, DiagnosticKind, Error, Result};
pub use map::GeonMap;
pub use model::{Coordinate, Extent, Place, TextMap, Viewsheds};
pub use options::{GenerateOptions, ParseOptions};
pub use ser::Generator;
pub use split::{split_documents, Documents};
pub use validate::{validate, validate_with, Issue, Severity, ValidationReport};
pub use value::Value;
pub use vocab::Vocabulary;

use std::io;

/// A parsed place together with everything the parser had to be lenient about.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub place: Place,
    /// Parser diagnostics first, then entity mapper diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse a single GEON document into a [`Place`].
///
/// Diagnostics are discarded; use [`parse_with_options`] to keep them.
///
/// # Examples
///
/// ```rust
/// use geon::parse;
///
/// let place = parse("PLACE: Harbour\nTYPE: infrastructure").unwrap();
/// assert_eq!(place.category, "infrastructure");
/// assert!(place.location.is_none());
/// ```
///
/// # Errors
///
/// Returns [`Error::RecursionLimit`] if blocks nest deeper than
/// [`options::DEFAULT_MAX_DEPTH`]. No other input fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse(text: &str) -> Result<Place> {
    parse_with_options(text, &ParseOptions::default()).map(|parsed| parsed.place)
}

/// Parse a single GEON document with custom options, keeping diagnostics.
///
/// # Examples
///
/// ```rust
/// use geon::{parse_with_options, Error, ParseOptions};
///
/// let text = "PLACE: A\nCONTAINS:\n  - PLACE: B\n      CONTAINS:\n        - PLACE: C\n";
/// let shallow = ParseOptions::new().with_max_depth(2);
/// assert!(matches!(parse_with_options(text, &shallow), Err(Error::RecursionLimit { .. })));
/// ```
///
/// # Errors
///
/// Returns [`Error::RecursionLimit`] if blocks nest deeper than
/// `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_with_options(text: &str, options: &ParseOptions) -> Result<Parsed> {
    let (root, mut diagnostics) = de::parse_tree(text, options)?;
    let (place, mapped) = mapper::map_place(root);
    diagnostics.extend(mapped);
    Ok(Parsed { place, diagnostics })
}

/// Parse a stream of concatenated documents.
///
/// Each document is parsed independently, so one that exceeds the nesting
/// limit does not affect the others.
///
/// # Examples
///
/// ```rust
/// use geon::parse_many;
///
/// let places = parse_many("PLACE: A\nTYPE: x\n\nPLACE: B\nTYPE: y\n");
/// assert_eq!(places.len(), 2);
/// assert_eq!(places[1].as_ref().unwrap().name, "B");
/// ```
#[must_use]
pub fn parse_many(text: &str) -> Vec<Result<Place>> {
    split_documents(text).map(parse).collect()
}

/// Parse a document into the generic tree without mapping it onto [`Place`].
///
/// The result is always a [`Value::Map`].
///
/// # Examples
///
/// ```rust
/// use geon::{parse_value, Value};
///
/// let tree = parse_value("PLACE: Well\nDEPTH: 30m").unwrap();
/// assert_eq!(tree.as_map().and_then(|m| m.get("DEPTH")), Some(&Value::from("30m")));
/// ```
///
/// # Errors
///
/// Returns [`Error::RecursionLimit`] if blocks nest deeper than
/// [`options::DEFAULT_MAX_DEPTH`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_value(text: &str) -> Result<Value> {
    let (root, _) = de::parse_tree(text, &ParseOptions::default())?;
    Ok(Value::Map(root))
}

/// Generate the canonical GEON text for a place.
///
/// Generation is total: every place value produces a document.
///
/// # Examples
///
/// ```rust
/// use geon::{generate, Place};
///
/// let mut place = Place::new("Arcade", "building");
/// place.purpose = vec!["retail".to_string(), "social".to_string()];
///
/// assert_eq!(
///     generate(&place),
///     "PLACE: Arcade\nTYPE: building\nPURPOSE:\n  - retail\n  - social\n"
/// );
/// ```
#[must_use]
pub fn generate(place: &Place) -> String {
    generate_with_options(place, &GenerateOptions::default())
}

/// Generate GEON text with custom indentation and child separation.
///
/// # Examples
///
/// ```rust
/// use geon::{generate_with_options, GenerateOptions, Place};
///
/// let mut place = Place::new("Lane", "street");
/// place.character = vec!["narrow".to_string(), "cobbled".to_string()];
/// let text = generate_with_options(&place, &GenerateOptions::new().with_indent(4));
/// assert!(text.contains("\n    - narrow\n"));
/// ```
#[must_use]
pub fn generate_with_options(place: &Place, options: &GenerateOptions) -> String {
    let mut generator = Generator::new(options.clone());
    generator.write_place(place);
    generator.into_inner()
}

/// Generate several documents separated by blank lines.
///
/// [`parse_many`] reads the result back.
#[must_use]
pub fn generate_many(places: &[Place]) -> String {
    places
        .iter()
        .map(generate)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the canonical GEON text for a place to a writer.
///
/// # Examples
///
/// ```rust
/// use geon::{to_writer, Place};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Place::new("Gate", "threshold")).unwrap();
/// assert_eq!(buffer, b"PLACE: Gate\nTYPE: threshold\n");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(mut writer: W, place: &Place) -> Result<()>
where
    W: io::Write,
{
    writer.write_all(generate(place).as_bytes())?;
    Ok(())
}

/// Parse a single document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use geon::from_reader;
/// use std::io::Cursor;
///
/// let place = from_reader(Cursor::new(b"PLACE: Mill\nTYPE: building")).unwrap();
/// assert_eq!(place.name, "Mill");
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails or the input is not UTF-8, and
/// [`Error::RecursionLimit`] as for [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R>(mut reader: R) -> Result<Place>
where
    R: io::Read,
{
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse(&text)
}

/// Parse a single document from UTF-8 bytes.
///
/// # Errors
///
/// Returns [`Error::Custom`] if the bytes are not valid UTF-8, and
/// [`Error::RecursionLimit`] as for [`parse`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Place> {
    let text = std::str::from_utf8(bytes).map_err(|e| Error::custom(e.to_string()))?;
    parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let place = parse("PLACE: My Park\nTYPE: public_space\nLOCATION: 51.5, -0.1\n").unwrap();
        let mut expected = Place::new("My Park", "public_space").with_location(51.5, -0.1);
        assert_eq!(place, expected);

        expected.purpose.push("leisure".to_string());
        assert_ne!(place, expected);
    }

    #[test]
    fn test_parse_with_options_orders_diagnostics() {
        let text = "PLACE: P\n        orphan: x\nLOCATION: nowhere\n";
        let parsed = parse_with_options(text, &ParseOptions::new()).unwrap();
        let kinds: Vec<_> = parsed.diagnostics.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::OrphanedLine, DiagnosticKind::NumericFormat]);
    }

    #[test]
    fn test_parse_many_round_trip() {
        let places = vec![
            Place::new("A", "street").with_location(1.0, 2.0),
            Place::new("B", "building"),
            Place::new("C", "landmark"),
        ];
        let text = generate_many(&places);
        let parsed: Vec<Place> = parse_many(&text).into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(parsed, places);
    }

    #[test]
    fn test_parse_many_isolates_failures() {
        let text = "PLACE: Fine\nX:\n  a: b\nPLACE: Deep\nX:\n  A:\n    b: c\n";
        let results: Vec<_> = split_documents(text)
            .map(|doc| parse_with_options(doc, &ParseOptions::new().with_max_depth(1)))
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(Error::RecursionLimit { .. })));
    }

    #[test]
    fn test_parse_value_is_map() {
        let value = parse_value("").unwrap();
        assert_eq!(value, Value::Map(GeonMap::new()));
    }

    #[test]
    fn test_writer_and_reader() {
        let place = Place::new("Bridge", "infrastructure").with_location(51.508, -0.0877);
        let mut buffer = Vec::new();
        to_writer(&mut buffer, &place).unwrap();
        assert_eq!(from_reader(buffer.as_slice()).unwrap(), place);
        assert_eq!(from_slice(&buffer).unwrap(), place);
    }

    #[test]
    fn test_from_slice_invalid_utf8() {
        assert!(matches!(from_slice(&[0xff, 0xfe]), Err(Error::Custom(_))));
    }

    #[test]
    fn test_io_failures() {
        struct Closed;

        impl io::Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let err = to_writer(Closed, &Place::new("Gate", "threshold")).unwrap_err();
        assert_eq!(err, Error::Io("pipe closed".to_string()));

        let err = from_reader(&[0xff, 0xfe][..]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
