//! Line tokenizer.
//!
//! GEON structure is carried entirely by indentation, so the tokenizer only
//! has to turn text into one [`Line`] per non-blank line. Nothing here can
//! fail; malformed indentation is the block parser's problem.

/// One non-blank source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    /// Count of leading space characters.
    pub depth: usize,
    /// The line with surrounding whitespace removed.
    pub content: &'a str,
}

impl<'a> Line<'a> {
    /// Returns `true` for `-` and `- text` lines.
    #[inline]
    #[must_use]
    pub fn is_dash_item(&self) -> bool {
        self.content == "-" || self.content.starts_with("- ")
    }

    /// Text after the dash marker, or `None` if this is not a dash item.
    #[must_use]
    pub fn dash_text(&self) -> Option<&'a str> {
        if self.content == "-" {
            Some("")
        } else {
            self.content.strip_prefix("- ").map(str::trim)
        }
    }

    /// The same line moved `by` columns to the left.
    #[must_use]
    pub(crate) fn shifted(self, by: usize) -> Self {
        Line {
            depth: self.depth.saturating_sub(by),
            ..self
        }
    }
}

/// Splits text into lines, dropping blank ones.
///
/// # Examples
///
/// ```rust
/// use geon::lexer::tokenize;
///
/// let lines = tokenize("PLACE: Park\n\n  TYPE: x  \n");
/// assert_eq!(lines.len(), 2);
/// assert_eq!((lines[1].number, lines[1].depth, lines[1].content), (3, 2, "TYPE: x"));
/// ```
#[must_use]
pub fn tokenize(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let content = raw.trim();
            if content.is_empty() {
                return None;
            }
            Some(Line {
                number: i + 1,
                depth: raw.len() - raw.trim_start_matches(' ').len(),
                content,
            })
        })
        .collect()
}

/// Splits `KEY: value` at the first colon.
///
/// Returns `None` when there is no colon or the key is empty. The value is
/// trimmed and may be empty, which marks a block header.
///
/// # Examples
///
/// ```rust
/// use geon::lexer::split_key;
///
/// assert_eq!(split_key("OPENING: 08:00"), Some(("OPENING", "08:00")));
/// assert_eq!(split_key("CONTAINS:"), Some(("CONTAINS", "")));
/// assert_eq!(split_key("just text"), None);
/// ```
#[must_use]
pub fn split_key(content: &str) -> Option<(&str, &str)> {
    let (key, value) = content.split_once(':')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim()))
}
