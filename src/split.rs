//! Multi-document splitting.
//!
//! A stream of concatenated GEON documents is cut wherever a flush-left
//! `PLACE:` line appears after some content. Each chunk is parsed on its own,
//! so a malformed document does not affect its neighbours.

use crate::model::keys;

/// Iterator over the documents in a GEON text stream.
///
/// Created by [`split_documents`]. Chunks borrow from the input and keep
/// their trailing newlines and blank lines; leading blank lines before the
/// first document are dropped.
#[derive(Debug, Clone)]
pub struct Documents<'a> {
    rest: &'a str,
}

/// Splits `text` at top-level `PLACE` lines.
///
/// # Examples
///
/// ```rust
/// use geon::split_documents;
///
/// let text = "PLACE: A\nTYPE: x\n\nPLACE: B\nTYPE: y\n";
/// let docs: Vec<&str> = split_documents(text).collect();
/// assert_eq!(docs, vec!["PLACE: A\nTYPE: x\n\n", "PLACE: B\nTYPE: y\n"]);
/// ```
#[must_use]
pub fn split_documents(text: &str) -> Documents<'_> {
    Documents { rest: text }
}

fn starts_document(line: &str) -> bool {
    line.strip_prefix(keys::PLACE)
        .map_or(false, |rest| rest.trim_start().starts_with(':'))
}

impl<'a> Iterator for Documents<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let mut offset = 0;
        let mut has_content = false;
        let mut start = None;

        for line in self.rest.split_inclusive('\n') {
            let is_blank = line.trim().is_empty();
            if has_content && starts_document(line) {
                break;
            }
            if !is_blank {
                has_content = true;
                start.get_or_insert(offset);
            }
            offset += line.len();
        }

        let start = match start {
            Some(start) => start,
            None => {
                self.rest = "";
                return None;
            }
        };

        let chunk = &self.rest[start..offset];
        self.rest = &self.rest[offset..];
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_document() {
        let docs: Vec<_> = split_documents("PLACE: A\nTYPE: x").collect();
        assert_eq!(docs, vec!["PLACE: A\nTYPE: x"]);
    }

    #[test]
    fn test_indented_place_does_not_split() {
        let text = "PLACE: A\nCONTAINS:\n  - PLACE: B\n      TYPE: t\nPLACE: C\n";
        let docs: Vec<_> = split_documents(text).collect();
        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("- PLACE: B"));
        assert_eq!(docs[1], "PLACE: C\n");
    }

    #[test]
    fn test_leading_content_before_place() {
        let text = "\n\nTYPE: orphan\nPLACE: A\n";
        let docs: Vec<_> = split_documents(text).collect();
        assert_eq!(docs, vec!["TYPE: orphan\n", "PLACE: A\n"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(split_documents("").count(), 0);
        assert_eq!(split_documents("\n  \n").count(), 0);
    }

    #[test]
    fn test_place_prefixed_keys_do_not_split() {
        let text = "PLACE: A\nPLACEMENT: left\nPLACE : B\n";
        let docs: Vec<_> = split_documents(text).collect();
        assert_eq!(docs, vec!["PLACE: A\nPLACEMENT: left\n", "PLACE : B\n"]);
    }
}
