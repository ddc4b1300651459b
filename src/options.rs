//! Configuration options for GEON parsing and generation.
//!
//! - [`ParseOptions`]: limits applied while reading text
//! - [`GenerateOptions`]: layout of generated text
//!
//! ## Examples
//!
//! ```rust
//! use geon::{generate_with_options, parse_with_options, GenerateOptions, ParseOptions, Place};
//!
//! let place = Place::new("Market Square", "public_space");
//! let text = generate_with_options(&place, &GenerateOptions::new().with_indent(4));
//!
//! let parsed = parse_with_options(&text, &ParseOptions::new().with_max_depth(16)).unwrap();
//! assert_eq!(parsed.place, place);
//! ```

/// Default limit on block nesting. Every `KEY:` block and every structured
/// list item counts one level, so a chain of places nested through
/// `CONTAINS` uses two levels per place.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Configuration options for parsing GEON text.
///
/// # Examples
///
/// ```rust
/// use geon::ParseOptions;
///
/// let options = ParseOptions::new();
/// assert_eq!(options.max_depth, geon::options::DEFAULT_MAX_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest block nesting accepted before parsing fails with
    /// [`Error::RecursionLimit`](crate::Error::RecursionLimit).
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum block nesting depth.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geon::ParseOptions;
    ///
    /// let options = ParseOptions::new().with_max_depth(8);
    /// assert_eq!(options.max_depth, 8);
    /// ```
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Configuration options for generating GEON text.
///
/// # Examples
///
/// ```rust
/// use geon::GenerateOptions;
///
/// let options = GenerateOptions::new();
/// assert_eq!(options.indent, 2);
/// assert!(options.separate_children);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Spaces per nesting level.
    pub indent: usize,
    /// Write a blank line between sibling places in `CONTAINS`.
    pub separate_children: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions {
            indent: 2,
            separate_children: true,
        }
    }
}

impl GenerateOptions {
    /// Creates default options (2-space indent, blank line between children).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level). Zero is
    /// treated as one, since nesting must stay visible.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Sets whether sibling places are separated by a blank line.
    #[must_use]
    pub fn with_separate_children(mut self, separate: bool) -> Self {
        self.separate_children = separate;
        self
    }
}
