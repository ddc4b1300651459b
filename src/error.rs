//! Error and diagnostic types for GEON parsing, generation, and conversion.
//!
//! GEON separates two kinds of trouble:
//!
//! - **Errors** ([`Error`]) are fatal for the operation that raised them:
//!   nesting deeper than the configured limit, a geometry that cannot be
//!   converted, malformed JSON, I/O failures.
//! - **Diagnostics** ([`Diagnostic`]) record the places where the parser or
//!   the entity mapper had to be lenient: orphaned lines, blocks mixing list
//!   and mapping syntax, numbers that do not parse. The document is still
//!   produced; diagnostics tell the caller what was dropped or coerced.
//!
//! ## Examples
//!
//! ```rust
//! use geon::{parse_with_options, DiagnosticKind, ParseOptions};
//!
//! let parsed = parse_with_options("PLACE: Park\nLOCATION: north, west", &ParseOptions::new()).unwrap();
//! assert!(parsed.place.location.is_none());
//! assert_eq!(parsed.diagnostics[0].kind, DiagnosticKind::NumericFormat);
//! ```

use std::fmt;
use thiserror::Error;

/// Represents all fatal errors raised by GEON operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Block nesting exceeded [`ParseOptions::max_depth`](crate::ParseOptions::max_depth)
    #[error("Nesting limit of {limit} levels exceeded at line {line}")]
    RecursionLimit { limit: usize, line: usize },

    /// A coordinate or extent did not parse as numbers
    #[error("Invalid {field} value {value:?}: expected {expected}")]
    NumericFormat {
        field: String,
        value: String,
        expected: String,
    },

    /// A GeoJSON geometry that has no representative point
    #[error("Unsupported geometry: {0}")]
    UnsupportedGeometry(String),

    /// A JSON document that is neither a Feature nor a FeatureCollection
    #[error("Invalid GeoJSON: {0}")]
    InvalidGeoJson(String),

    /// JSON syntax error
    #[error("JSON error: {0}")]
    Json(String),

    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a recursion-limit error for a block starting at `line`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geon::Error;
    ///
    /// let err = Error::recursion_limit(64, 12);
    /// assert!(err.to_string().contains("line 12"));
    /// ```
    pub fn recursion_limit(limit: usize, line: usize) -> Self {
        Error::RecursionLimit { limit, line }
    }

    /// Creates a numeric format error for a field whose text is not a number list.
    pub fn numeric_format(field: &str, value: &str, expected: &str) -> Self {
        Error::NumericFormat {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Creates an unsupported geometry error.
    pub fn unsupported_geometry(msg: &str) -> Self {
        Error::UnsupportedGeometry(msg.to_string())
    }

    /// Creates an invalid GeoJSON error.
    pub fn invalid_geojson(msg: &str) -> Self {
        Error::InvalidGeoJson(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geon::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Creates an I/O error for reading/writing failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::io(&err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The category of a recoverable problem found while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Lines indented deeper than any open block. A line shallower than its
    /// block closes it, and the run from there is skipped.
    OrphanedLine,
    /// A block mixing dash items and `KEY: value` lines at one depth, or a
    /// line with no `KEY:` where a mapping entry was expected.
    StructuralAmbiguity,
    /// A key repeated within one mapping. The last value wins.
    DuplicateKey,
    /// A coordinate, boundary point, or extent that is not a number list.
    NumericFormat,
    /// A structured value flattened to text, or text dropped where a
    /// mapping was expected.
    Coercion,
}

impl DiagnosticKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::OrphanedLine => "orphaned-line",
            DiagnosticKind::StructuralAmbiguity => "structural-ambiguity",
            DiagnosticKind::DuplicateKey => "duplicate-key",
            DiagnosticKind::NumericFormat => "numeric-format",
            DiagnosticKind::Coercion => "coercion",
        }
    }
}

/// A recoverable problem recorded while turning text into a [`Place`](crate::Place).
///
/// `line` is the 1-based source line for problems found by the block parser;
/// the entity mapper works on the parsed tree and reports field paths in the
/// message instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn at_line(kind: DiagnosticKind, line: usize, message: String) -> Self {
        let diagnostic = Diagnostic {
            kind,
            line: Some(line),
            message,
        };
        log::debug!("{}", diagnostic);
        diagnostic
    }

    pub(crate) fn for_field(kind: DiagnosticKind, message: String) -> Self {
        let diagnostic = Diagnostic {
            kind,
            line: None,
            message,
        };
        log::debug!("{}", diagnostic);
        diagnostic
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.kind.as_str(), line, self.message),
            None => write!(f, "[{}] {}", self.kind.as_str(), self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::numeric_format("EXTENT", "1, 2", "four numbers");
        assert_eq!(
            err.to_string(),
            "Invalid EXTENT value \"1, 2\": expected four numbers"
        );
        assert!(Error::unsupported_geometry("Circle")
            .to_string()
            .contains("Circle"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: Error = io_err.into();
        assert_eq!(err, Error::Io("no such file".to_string()));
        assert_eq!(err.to_string(), "IO error: no such file");
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::at_line(DiagnosticKind::OrphanedLine, 4, "skipped".to_string());
        assert_eq!(d.to_string(), "[orphaned-line] line 4: skipped");

        let d = Diagnostic::for_field(DiagnosticKind::Coercion, "TEMPORAL.peak".to_string());
        assert_eq!(d.to_string(), "[coercion] TEMPORAL.peak");
    }
}
