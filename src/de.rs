//! GEON block parsing.
//!
//! This module turns tokenized lines into the generic [`Value`] tree. The
//! entity mapper then projects that tree onto a [`Place`](crate::Place).
//!
//! ## Overview
//!
//! Indentation is the only structural signal:
//!
//! - **Scalars**: `KEY: value` assigns text at the current depth
//! - **Blocks**: `KEY:` opens a child block of every following deeper line
//! - **Kind by first line**: a block whose first line is a dash item is a
//!   list, anything else is a mapping. There is no backtracking.
//! - **Nested places**: `- PLACE: name` gathers its deeper lines, re-bases
//!   them to column zero, and parses them as a document of their own
//!
//! ## Leniency
//!
//! Input that does not fit the grammar is skipped, never fatal. Each skipped
//! run of lines (with its deeper subtree) produces one [`Diagnostic`]. The
//! only parse failure is nesting beyond
//! [`ParseOptions::max_depth`](crate::ParseOptions::max_depth).
//!
//! ```rust
//! use geon::{parse_value, Value};
//!
//! let tree = parse_value("PLACE: Yard\nCONTAINS:\n  - PLACE: Shed\n      TYPE: building").unwrap();
//! let contains = tree.as_map().unwrap().get("CONTAINS").and_then(Value::as_list).unwrap();
//! let shed = contains[0].as_map().unwrap();
//! assert_eq!(shed.get("TYPE").and_then(Value::as_str), Some("building"));
//! ```

use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer::{split_key, tokenize, Line};
use crate::model::keys;
use crate::{Error, GeonMap, ParseOptions, Result, Value};

/// Synthetic key holding the text of a plain list item that has sub-fields.
///
/// ```text
/// ADJACENCIES:
///   - Canal towpath
///       access: gated
/// ```
///
/// parses the item as `{_value: Canal towpath, access: gated}`.
pub const ITEM_VALUE_KEY: &str = "_value";

/// Recursive-descent parser over a slice of [`Line`]s.
///
/// Created per document; collects diagnostics as it goes.
pub struct BlockParser {
    max_depth: usize,
    diagnostics: Vec<Diagnostic>,
}

impl BlockParser {
    #[must_use]
    pub fn new(options: &ParseOptions) -> Self {
        BlockParser {
            max_depth: options.max_depth,
            diagnostics: Vec::new(),
        }
    }

    /// Consumes the parser, returning its diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Parses a whole document into its root mapping.
    ///
    /// The root's base depth is the shallowest line, so a uniformly indented
    /// document reads as if it were flush-left.
    pub fn parse_document(&mut self, lines: &[Line<'_>]) -> Result<GeonMap> {
        let Some(base) = lines.iter().map(|line| line.depth).min() else {
            return Ok(GeonMap::new());
        };
        self.parse_mapping(lines, base, 0)
    }

    fn enter(&self, level: usize, line: usize) -> Result<()> {
        if level > self.max_depth {
            return Err(Error::recursion_limit(self.max_depth, line));
        }
        Ok(())
    }

    fn note(&mut self, kind: DiagnosticKind, line: usize, message: String) {
        self.diagnostics.push(Diagnostic::at_line(kind, line, message));
    }

    /// Parses a child block. Its base depth is the depth of its first line,
    /// and callers cut `lines` at the first line shallower than that.
    fn parse_block(&mut self, lines: &[Line<'_>], level: usize) -> Result<Value> {
        let Some(first) = lines.first() else {
            return Ok(Value::List(Vec::new()));
        };
        self.enter(level, first.number)?;

        if first.is_dash_item() {
            log::trace!("list block at line {} (level {})", first.number, level);
            self.parse_list(lines, first.depth, level).map(Value::List)
        } else {
            log::trace!("mapping block at line {} (level {})", first.number, level);
            self.parse_mapping(lines, first.depth, level).map(Value::Map)
        }
    }

    fn parse_mapping(&mut self, lines: &[Line<'_>], base: usize, level: usize) -> Result<GeonMap> {
        let mut map = GeonMap::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if line.depth != base {
                i = self.skip_misaligned(lines, i, base);
                continue;
            }

            let end = deeper_run_end(lines, i + 1, base);

            if line.is_dash_item() {
                self.note(
                    DiagnosticKind::StructuralAmbiguity,
                    line.number,
                    format!("list item {:?} inside a mapping block skipped", line.content),
                );
                i = end;
                continue;
            }

            let Some((key, text)) = split_key(line.content) else {
                self.note(
                    DiagnosticKind::StructuralAmbiguity,
                    line.number,
                    format!("line {:?} has no `KEY:` and was skipped", line.content),
                );
                i = end;
                continue;
            };

            if text.is_empty() {
                // Anything after the block closes is left for the next pass
                let block_end = i + 1 + aligned_len(&lines[i + 1..end]);
                let value = self.parse_block(&lines[i + 1..block_end], level + 1)?;
                self.insert_entry(&mut map, key, value, line.number);
                i = block_end;
            } else {
                // Lines indented under a scalar are left for the next pass,
                // which reports them as orphaned.
                self.insert_entry(&mut map, key, Value::Scalar(text.to_string()), line.number);
                i += 1;
            }
        }

        Ok(map)
    }

    fn parse_list(&mut self, lines: &[Line<'_>], base: usize, level: usize) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];

            if line.depth != base {
                i = self.skip_misaligned(lines, i, base);
                continue;
            }

            let end = deeper_run_end(lines, i + 1, base);

            let Some(text) = line.dash_text() else {
                self.note(
                    DiagnosticKind::StructuralAmbiguity,
                    line.number,
                    format!("mapping line {:?} inside a list block skipped", line.content),
                );
                i = end;
                continue;
            };

            let fields_end = i + 1 + aligned_len(&lines[i + 1..end]);
            let item = self.parse_item(line, text, &lines[i + 1..fields_end], level)?;
            items.push(item);
            i = fields_end;
        }

        Ok(items)
    }

    /// Parses one dash item together with the lines indented under it.
    fn parse_item(
        &mut self,
        line: Line<'_>,
        text: &str,
        children: &[Line<'_>],
        level: usize,
    ) -> Result<Value> {
        let entry = split_key(text);
        let is_place = matches!(entry, Some((key, _)) if key == keys::PLACE);

        if children.is_empty() {
            return Ok(match entry {
                Some((key, value)) if is_place => {
                    let mut map = GeonMap::new();
                    map.insert(key.to_string(), Value::Scalar(value.to_string()));
                    Value::Map(map)
                }
                _ => Value::Scalar(text.to_string()),
            });
        }

        let rebased = rebase(children);
        let rest = self.parse_block(&rebased, level + 1)?;

        if text.is_empty() {
            return Ok(rest);
        }

        let mut map = GeonMap::new();
        match entry {
            Some((key, value)) => {
                map.insert(key.to_string(), Value::Scalar(value.to_string()));
            }
            None => {
                map.insert(ITEM_VALUE_KEY.to_string(), Value::Scalar(text.to_string()));
            }
        }

        match rest {
            Value::Map(fields) => {
                for (key, value) in fields {
                    self.insert_entry(&mut map, &key, value, line.number);
                }
            }
            other => {
                self.note(
                    DiagnosticKind::StructuralAmbiguity,
                    line.number,
                    format!(
                        "item {:?} is followed by a nested {} where fields were expected; dropped",
                        text,
                        if other.is_list() { "list" } else { "value" }
                    ),
                );
            }
        }

        Ok(Value::Map(map))
    }

    /// Skips a run of lines indented deeper than the block's base depth and
    /// returns the index of the next aligned line.
    ///
    /// Blocks never see lines shallower than their base: the caller cuts the
    /// block there, and the enclosing level reports the rest.
    fn skip_misaligned(&mut self, lines: &[Line<'_>], start: usize, base: usize) -> usize {
        let line = lines[start];
        let end = deeper_run_end(lines, start + 1, base);

        self.note(
            DiagnosticKind::OrphanedLine,
            line.number,
            format!(
                "{} line(s) at unexpected indentation starting with {:?} skipped",
                end - start,
                line.content
            ),
        );
        end
    }

    fn insert_entry(&mut self, map: &mut GeonMap, key: &str, value: Value, line: usize) {
        if map.insert(key.to_string(), value).is_some() {
            self.note(
                DiagnosticKind::DuplicateKey,
                line,
                format!("duplicate key `{}`; the last value wins", key),
            );
        }
    }
}

/// Index of the first line at or after `from` that is not deeper than `base`.
fn deeper_run_end(lines: &[Line<'_>], from: usize, base: usize) -> usize {
    from + lines[from..]
        .iter()
        .take_while(|line| line.depth > base)
        .count()
}

/// Number of leading lines no shallower than the first one.
fn aligned_len(lines: &[Line<'_>]) -> usize {
    let Some(first) = lines.first() else {
        return 0;
    };
    lines.iter().take_while(|line| line.depth >= first.depth).count()
}

/// Shifts an item's field lines so the first one sits at column zero.
fn rebase<'a>(fields: &[Line<'a>]) -> Vec<Line<'a>> {
    let Some(field_depth) = fields.first().map(|line| line.depth) else {
        return Vec::new();
    };
    fields.iter().map(|line| line.shifted(field_depth)).collect()
}

/// Tokenizes and block-parses `text`, returning the root mapping together
/// with any diagnostics.
pub fn parse_tree(text: &str, options: &ParseOptions) -> Result<(GeonMap, Vec<Diagnostic>)> {
    let lines = tokenize(text);
    let mut parser = BlockParser::new(options);
    let root = parser.parse_document(&lines)?;
    Ok((root, parser.into_diagnostics()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> (GeonMap, Vec<Diagnostic>) {
        parse_tree(text, &ParseOptions::new()).unwrap()
    }

    fn scalar(s: &str) -> Value {
        Value::Scalar(s.to_string())
    }

    #[test]
    fn test_scalars_and_blocks() {
        let (root, diagnostics) = tree(
            "PLACE: Old Market\nTYPE: public_space\nPURPOSE:\n  - trade\n  - gathering\nEXPERIENCE:\n  noise: moderate\n",
        );
        assert!(diagnostics.is_empty());
        assert_eq!(root.get("PLACE"), Some(&scalar("Old Market")));
        assert_eq!(
            root.get("PURPOSE"),
            Some(&Value::List(vec![scalar("trade"), scalar("gathering")]))
        );
        let experience = root.get("EXPERIENCE").and_then(Value::as_map).unwrap();
        assert_eq!(experience.get("noise"), Some(&scalar("moderate")));
    }

    #[test]
    fn test_empty_header_is_empty_list() {
        let (root, _) = tree("PLACE: x\nCONTAINS:\nTYPE: y");
        assert_eq!(root.get("CONTAINS"), Some(&Value::List(vec![])));
        assert_eq!(root.get("TYPE"), Some(&scalar("y")));
    }

    #[test]
    fn test_indented_document_is_rebased() {
        let (root, diagnostics) = tree("    PLACE: x\n    TYPE: y\n    PURPOSE:\n      - a");
        assert!(diagnostics.is_empty());
        assert_eq!(root.len(), 3);
    }

    #[test]
    fn test_nested_place_rebases_fields() {
        let text = "\
CONTAINS:
  - PLACE: Hall
      TYPE: building
      PURPOSE:
        - civic
  - PLACE: Yard
";
        let (root, diagnostics) = tree(text);
        assert!(diagnostics.is_empty());
        let items = root.get("CONTAINS").and_then(Value::as_list).unwrap();
        assert_eq!(items.len(), 2);

        let hall = items[0].as_map().unwrap();
        let keys: Vec<_> = hall.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["PLACE", "TYPE", "PURPOSE"]);
        assert_eq!(
            hall.get("PURPOSE"),
            Some(&Value::List(vec![scalar("civic")]))
        );

        // A place marker with no fields is still a mapping
        let yard = items[1].as_map().unwrap();
        assert_eq!(yard.get("PLACE"), Some(&scalar("Yard")));
    }

    #[test]
    fn test_item_with_subfields() {
        let text = "\
HISTORY:
  - year: 1840
      event: built
  - Rebuilt after fire
      year: 1902
  - plain entry
";
        let (root, _) = tree(text);
        let items = root.get("HISTORY").and_then(Value::as_list).unwrap();

        let first = items[0].as_map().unwrap();
        assert_eq!(first.first(), Some((&"year".to_string(), &scalar("1840"))));
        assert_eq!(first.get("event"), Some(&scalar("built")));

        let second = items[1].as_map().unwrap();
        assert_eq!(second.get(ITEM_VALUE_KEY), Some(&scalar("Rebuilt after fire")));
        assert_eq!(second.get("year"), Some(&scalar("1902")));

        assert_eq!(items[2], scalar("plain entry"));
    }

    #[test]
    fn test_anonymous_item() {
        let (root, _) = tree("X:\n  -\n    a: 1\n    b: 2\n  -\n    - inner");
        let items = root.get("X").and_then(Value::as_list).unwrap();
        assert!(items[0].is_map());
        assert_eq!(items[1], Value::List(vec![scalar("inner")]));
    }

    #[test]
    fn test_mixed_block_first_line_decides() {
        let (root, diagnostics) = tree("X:\n  - a\n  b: c\n  - d");
        assert_eq!(
            root.get("X"),
            Some(&Value::List(vec![scalar("a"), scalar("d")]))
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::StructuralAmbiguity);
        assert_eq!(diagnostics[0].line, Some(3));

        let (root, diagnostics) = tree("X:\n  b: c\n  - a\n    - nested");
        let map = root.get("X").and_then(Value::as_map).unwrap();
        assert_eq!(map.len(), 1);
        // The dash line and its subtree produce one diagnostic
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_orphaned_lines_skipped_as_one_run() {
        let (root, diagnostics) = tree("PLACE: x\n    stray one\n    stray two\nTYPE: y");
        assert_eq!(root.get("TYPE"), Some(&scalar("y")));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OrphanedLine);
        assert_eq!(diagnostics[0].line, Some(2));
    }

    #[test]
    fn test_shallower_line_closes_block() {
        let (root, diagnostics) = tree("X:\n    a: 1\n  b: 2\n    c: 3\nY: z");
        let map = root.get("X").and_then(Value::as_map).unwrap();
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a"]);
        assert_eq!(root.get("Y"), Some(&scalar("z")));

        // `b` and the line under it are one orphaned run at the root
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OrphanedLine);
        assert_eq!(diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_shallower_line_closes_item_fields() {
        let text = "CONTAINS:\n  - PLACE: A\n        TYPE: t\n      LOST: yes\n        ID: 1\n  - PLACE: B";
        let (root, diagnostics) = tree(text);
        let items = root.get("CONTAINS").and_then(Value::as_list).unwrap();
        assert_eq!(items.len(), 2);

        let first = items[0].as_map().unwrap();
        let keys: Vec<_> = first.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["PLACE", "TYPE"]);
        assert_eq!(items[1].as_map().and_then(|m| m.get("PLACE")), Some(&scalar("B")));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OrphanedLine);
        assert_eq!(diagnostics[0].line, Some(4));
    }

    #[test]
    fn test_parser_collects_diagnostics() {
        let lines = tokenize("PLACE: x\n    stray\nTYPE: y");
        let mut parser = BlockParser::new(&ParseOptions::new());
        let root = parser.parse_document(&lines).unwrap();
        assert_eq!(root.len(), 2);

        let diagnostics = parser.into_diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].line, Some(2));
    }

    #[test]
    fn test_line_without_key() {
        let (root, diagnostics) = tree("PLACE: x\njust words\nTYPE: y");
        assert_eq!(root.len(), 2);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::StructuralAmbiguity);
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let (root, diagnostics) = tree("TYPE: a\nPLACE: x\nTYPE: b");
        assert_eq!(root.get("TYPE"), Some(&scalar("b")));
        // Position of the first occurrence is kept
        assert_eq!(root.first().map(|(k, _)| k.as_str()), Some("TYPE"));
        assert_eq!(diagnostics[0].kind, DiagnosticKind::DuplicateKey);
        assert_eq!(diagnostics[0].line, Some(3));
    }

    #[test]
    fn test_recursion_limit() {
        let mut text = String::new();
        for depth in 0..10 {
            text.push_str(&" ".repeat(depth * 2));
            text.push_str("K:\n");
        }
        let options = ParseOptions::new().with_max_depth(4);
        let err = parse_tree(&text, &options).unwrap_err();
        assert_eq!(err, Error::RecursionLimit { limit: 4, line: 6 });

        assert!(parse_tree(&text, &ParseOptions::new()).is_ok());
    }

    #[test]
    fn test_empty_document() {
        let (root, diagnostics) = tree("\n   \n");
        assert!(root.is_empty());
        assert!(diagnostics.is_empty());
    }
}
