//! Validating places against the controlled vocabularies.
//!
//! Run with: cargo run --example validate

use geon::{parse, validate, validate_with, Severity, Vocabulary};
use std::error::Error;

const DOCUMENT: &str = "\
PLACE: Harbour Steps
TYPE: waterfront
LOCATION: 50.3660, -4.1380
PURPOSE:
  - leisure
  - fishing
EXPERIENCE:
  openness: very_high
  noise_level: roaring
UPDATED: last spring
CONTAINS:
  - PLACE: Slipway
      TYPE: infrastructure
      LOCATION: 95.0, -4.1381
";

const HARBOUR_TYPES: &[&str] = &["waterfront", "infrastructure", "quay"];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let place = parse(DOCUMENT)?;

    let report = validate(&place);
    println!("Standard vocabulary:\n{}\n", report);
    println!(
        "{} error(s), {} warning(s), {} info",
        report.errors().count(),
        report.warnings().count(),
        report.infos().count()
    );
    println!("Valid: {}\n", report.is_valid());

    let vocab = Vocabulary::standard().with_categories(HARBOUR_TYPES);
    let custom = validate_with(&place, &vocab);
    println!("Harbour vocabulary warnings:");
    for issue in custom.issues.iter().filter(|i| i.severity == Severity::Warning) {
        println!("  {}", issue);
    }

    Ok(())
}
