//! Semantic validation of places.
//!
//! The parser accepts almost anything, so a parsed place can be incomplete
//! or use values outside the controlled vocabularies. [`validate`] reports
//! those problems as ordered [`Issue`]s. A place is valid when none of them
//! has [`Severity::Error`].
//!
//! ## Examples
//!
//! ```rust
//! use geon::{parse, validate, Severity};
//!
//! let place = parse("PLACE: Dock\nTYPE: spaceport\nLOCATION: 95.0, 0.0").unwrap();
//! let report = validate(&place);
//!
//! assert!(!report.is_valid());
//! assert_eq!(report.issues[0].severity, Severity::Warning);
//! assert_eq!(report.errors().count(), 1);
//! ```

use crate::model::keys;
use crate::vocab::{Vocabulary, RECOMMENDED_FIELDS, REQUIRED_FIELDS};
use crate::Place;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding. `field` is a path such as `EXPERIENCE.pace` or
/// `CONTAINS[1].LOCATION`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.field, self.message)
    }
}

/// All findings for a place and its children, in check order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    /// `true` when there are no error-severity issues.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Warning)
    }

    pub fn infos(&self) -> impl Iterator<Item = &Issue> {
        self.with_severity(Severity::Info)
    }

    fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.severity == severity)
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return f.write_str("Valid (no issues)");
        }
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// Validates against [`Vocabulary::standard`].
#[must_use]
pub fn validate(place: &Place) -> ValidationReport {
    validate_with(place, &Vocabulary::standard())
}

/// Validates against a caller-supplied vocabulary.
#[must_use]
pub fn validate_with(place: &Place, vocab: &Vocabulary) -> ValidationReport {
    let mut checker = Checker {
        vocab,
        prefix: String::new(),
        issues: Vec::new(),
    };
    checker.place(place);
    log::debug!(
        "validated `{}`: {} issue(s)",
        place.name,
        checker.issues.len()
    );
    ValidationReport {
        issues: checker.issues,
    }
}

struct Checker<'v> {
    vocab: &'v Vocabulary,
    prefix: String,
    issues: Vec<Issue>,
}

impl Checker<'_> {
    fn push(&mut self, severity: Severity, field: &str, message: String) {
        self.issues.push(Issue {
            severity,
            field: format!("{}{}", self.prefix, field),
            message,
        });
    }

    fn place(&mut self, place: &Place) {
        self.required(place);
        self.category(place);
        self.location(place);
        self.boundary(place);
        self.extent(place);
        self.experience(place);
        self.purposes(place);
        self.updated(place);
        self.recommended(place);
        self.children(place);
    }

    fn required(&mut self, place: &Place) {
        for field in REQUIRED_FIELDS {
            let missing = match *field {
                keys::PLACE => place.name.is_empty(),
                keys::TYPE => place.category.is_empty(),
                keys::LOCATION => place.location.is_none(),
                _ => false,
            };
            if missing {
                self.push(
                    Severity::Error,
                    field,
                    format!("Required field {} is missing or empty", field),
                );
            }
        }
    }

    fn category(&mut self, place: &Place) {
        if !place.category.is_empty() && !self.vocab.is_category(&place.category) {
            self.push(
                Severity::Warning,
                keys::TYPE,
                format!(
                    "Type '{}' is not in the controlled vocabulary: {}",
                    place.category,
                    self.vocab.categories.join(", ")
                ),
            );
        }
    }

    fn location(&mut self, place: &Place) {
        let Some(location) = place.location else {
            return;
        };
        if !(-90.0..=90.0).contains(&location.lat) {
            self.push(
                Severity::Error,
                keys::LOCATION,
                format!("Latitude {} is out of range [-90, 90]", location.lat),
            );
        }
        if !(-180.0..=180.0).contains(&location.lon) {
            self.push(
                Severity::Error,
                keys::LOCATION,
                format!("Longitude {} is out of range [-180, 180]", location.lon),
            );
        }
    }

    fn boundary(&mut self, place: &Place) {
        if place.boundary.len() >= 3 && place.boundary.first() != place.boundary.last() {
            self.push(
                Severity::Warning,
                keys::BOUNDARY,
                "Boundary polygon is not closed (first and last coordinates differ)".to_string(),
            );
        }
    }

    fn extent(&mut self, place: &Place) {
        if let Some(extent) = place.extent {
            if extent.north < extent.south {
                self.push(
                    Severity::Warning,
                    keys::EXTENT,
                    format!("North edge {} is south of south edge {}", extent.north, extent.south),
                );
            }
        }
    }

    fn experience(&mut self, place: &Place) {
        for (quality, value) in &place.experience {
            let Some(scale) = self.vocab.scale(quality) else {
                continue;
            };
            // Qualifiers such as "moderate (daytime)" or "busy, weekends" are ignored
            let base = value.split('(').next().unwrap_or_default().trim();
            let base = base.split(',').next().unwrap_or_default().trim();
            // Compounds such as "medium-high" are accepted
            if base.contains('-') || scale.contains(&base) {
                continue;
            }
            self.push(
                Severity::Warning,
                &format!("{}.{}", keys::EXPERIENCE, quality),
                format!(
                    "Value '{}' is not in the controlled vocabulary: {}",
                    base,
                    scale.join(", ")
                ),
            );
        }
    }

    fn purposes(&mut self, place: &Place) {
        for (i, purpose) in place.purpose.iter().enumerate() {
            let base = purpose.split('(').next().unwrap_or_default().trim().to_lowercase();
            if self.vocab.purpose_category(&base).is_none() {
                self.push(
                    Severity::Info,
                    &format!("{}[{}]", keys::PURPOSE, i),
                    format!("Purpose '{}' is not in the purpose taxonomy", purpose),
                );
            }
        }
    }

    fn updated(&mut self, place: &Place) {
        if let Some(updated) = &place.updated {
            if !is_iso8601(updated) {
                self.push(
                    Severity::Warning,
                    keys::UPDATED,
                    format!("'{}' is not an ISO 8601 date or timestamp", updated),
                );
            }
        }
    }

    fn recommended(&mut self, place: &Place) {
        for field in RECOMMENDED_FIELDS {
            let empty = match *field {
                keys::PURPOSE => place.purpose.is_empty(),
                keys::EXPERIENCE => place.experience.is_empty(),
                keys::ADJACENCIES => place.adjacencies.is_empty(),
                keys::CONNECTIVITY => place.connectivity.is_empty(),
                keys::SOURCE => place.source.is_empty(),
                _ => false,
            };
            if empty {
                self.push(
                    Severity::Info,
                    field,
                    format!("Recommended field {} is empty", field),
                );
            }
        }
    }

    fn children(&mut self, place: &Place) {
        let outer = self.prefix.clone();
        for (i, child) in place.contains.iter().enumerate() {
            self.prefix = format!("{}{}[{}].", outer, keys::CONTAINS, i);
            self.place(child);
        }
        self.prefix = outer;
    }
}

/// Accepts a calendar date, a local timestamp, or an RFC 3339 timestamp.
fn is_iso8601(text: &str) -> bool {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_rfc3339(text).is_ok()
}
