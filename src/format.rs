//! GEON Notation Reference
//!
//! This module documents the GEON notation as read by [`parse`](crate::parse)
//! and written by [`generate`](crate::generate). It contains no code.
//!
//! # Overview
//!
//! A GEON document describes one place. Structure comes from indentation
//! alone: there are no braces, quotes, or type markers, and every scalar is
//! text. The typed model decides what a value means.
//!
//! # Core Syntax
//!
//! ## Scalars
//!
//! ```text
//! PLACE: Riverside Park
//! TYPE: public_space
//! LOCATION: 51.4875, -0.1687
//! ```
//!
//! **Rules**:
//! - The key is everything before the first `:`, trimmed. It must not be empty.
//! - The value is everything after it, trimmed. A value may itself contain
//!   colons (`HOURS: 08:00-18:00`).
//! - Leading and trailing whitespace is not representable.
//! - Depth is the count of leading spaces. Tabs are not indentation.
//! - Blank lines are ignored.
//!
//! ## Blocks
//!
//! A key with nothing after the colon opens a child block made of the lines
//! below it that are indented deeper. The first line of the block decides its
//! kind:
//!
//! ```text
//! EXPERIENCE:          # mapping: first line is `key: value`
//!   pace: slow
//!   noise_level: quiet
//! CHARACTER:           # list: first line starts with `- `
//!   - leafy
//!   - open
//! SOURCE:              # no child lines: an empty list
//! ```
//!
//! A block never changes kind part way through. A dash line inside a mapping,
//! or a `key: value` line inside a list, is skipped together with anything
//! indented under it.
//!
//! A line shallower than the first line of its block closes the block. If
//! it does not line up with the enclosing block either, it is skipped with
//! everything indented under it.
//!
//! ## Structured List Items
//!
//! | Item | Lines under it | Result |
//! |------|----------------|--------|
//! | `- text` | none | scalar `text` |
//! | `- PLACE: name` | none | mapping `{PLACE: name}` |
//! | `- key: value` | fields | mapping, `key` first, then the fields |
//! | `- text` | fields | mapping, `_value: text` first, then the fields |
//! | `-` | a block | that block, list or mapping |
//!
//! The fields under an item are read relative to the first of them, so any
//! consistent indentation works:
//!
//! ```text
//! HISTORY:
//!   - period: 1840s
//!       event: Market hall built
//!   - period: 1998
//!       event: Pedestrianised
//! ```
//!
//! # Nested Places
//!
//! `CONTAINS` holds whole documents. Each child starts with `- PLACE:` and its
//! fields sit two levels deeper than the dash:
//!
//! ```text
//! CONTAINS:
//!   - PLACE: Bandstand
//!       TYPE: landmark
//!       LOCATION: 51.4880, -0.1690
//!
//!   - PLACE: Pond
//!       TYPE: natural_feature
//! ```
//!
//! Children may contain children. Every block and every structured item
//! counts one level towards [`ParseOptions::max_depth`](crate::ParseOptions::max_depth),
//! so each nested place uses two.
//!
//! # Recognized Keys
//!
//! Written in this order, whatever order they were read in:
//!
//! | Group | Keys |
//! |-------|------|
//! | Identity | `PLACE`, `TYPE`, `ID` |
//! | Geometry | `LOCATION`, `BOUNDARY`, `EXTENT`, `ELEVATION`, `AREA` |
//! | Semantic | `PURPOSE`, `EXPERIENCE`, `CHARACTER` |
//! | Relational | `ADJACENCIES`, `CONNECTIVITY`, `CONTAINS`, `PART_OF`, `VIEWSHEDS` |
//! | Temporal | `TEMPORAL`, `LIFESPAN` |
//! | Provenance | `SOURCE`, `CONFIDENCE`, `UPDATED` |
//! | Extended | `BUILT_FORM`, `ECOLOGY`, `INFRASTRUCTURE`, `DEMOGRAPHICS`, `ECONOMY`, `VISUAL`, `HISTORY`, `VERTICAL_PROFILE` |
//!
//! Any other key is kept in the extension bag and written after the
//! recognized ones, in the order it was read.
//!
//! ## Numeric Fields
//!
//! | Key | Form | Example |
//! |-----|------|---------|
//! | `LOCATION` | `lat, lon` | `LOCATION: 51.5, -0.1` |
//! | `BOUNDARY` | list of `lat, lon` | `- 51.50, -0.10` |
//! | `EXTENT` | `north, south, east, west` | `EXTENT: 51.6, 51.4, 0.1, -0.3` |
//!
//! A value that does not parse, or that contains a non-finite number, leaves
//! the field unset and produces a `NumericFormat` diagnostic.
//!
//! # Generation Rules
//!
//! - `PLACE` and `TYPE` are always written, as a bare `KEY:` when empty.
//! - Unset optional values and empty collections are omitted.
//! - A single purpose is written inline: `PURPOSE: retail`.
//! - Typed mappings are written sorted by key.
//! - Newlines inside text are folded to spaces.
//! - Two spaces per level by default
//!   ([`GenerateOptions::with_indent`](crate::GenerateOptions::with_indent)).
//!
//! # Multiple Documents
//!
//! A stream holds several documents back to back. A new document starts at
//! each flush-left `PLACE:` line that follows some content:
//!
//! ```text
//! PLACE: North Gate
//! TYPE: threshold
//!
//! PLACE: South Gate
//! TYPE: threshold
//! ```
//!
//! # Limitations
//!
//! - Round trips preserve meaning, not bytes: comments, key order, spacing and
//!   quoting style of the source are not kept.
//! - A one-field mapping inside an extension list reads back as the scalar
//!   `key: value`.
//! - Empty extension values read back as empty lists.
//! - Extension keys containing `:` cannot be written and are skipped.
