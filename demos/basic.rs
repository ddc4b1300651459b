//! Parse a GEON document, inspect it, and write it back out.
//!
//! Run with: cargo run --example basic

use geon::{generate, parse_with_options, ParseOptions};
use std::error::Error;

const DOCUMENT: &str = "\
PLACE: Riverside Park
TYPE: public_space
LOCATION: 51.4875, -0.1687
PURPOSE:
  - leisure
  - play
EXPERIENCE:
  pace: slow
  noise_level: quiet
ADJACENCIES:
  - Albert Bridge (north)
      access: pedestrian
      opened: 1873
SOURCE: field survey
";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let parsed = parse_with_options(DOCUMENT, &ParseOptions::new())?;
    let place = &parsed.place;

    println!("Name:      {}", place.name);
    println!("Type:      {}", place.category);
    if let Some(location) = place.location {
        println!("Location:  {} (lat {}, lon {})", location, location.lat, location.lon);
    }
    println!("Purposes:  {}", place.purpose.join(", "));
    for (quality, value) in &place.experience {
        println!("Feels:     {} = {}", quality, value);
    }
    println!("Diagnostics: {}\n", parsed.diagnostics.len());
    for diagnostic in &parsed.diagnostics {
        println!("  {}", diagnostic);
    }

    // Regenerate in canonical form
    let text = generate(place);
    println!("\nCanonical form:\n{}", text);

    let again = parse_with_options(&text, &ParseOptions::new())?;
    assert_eq!(generate(&again.place), text);
    println!("✓ Canonical form is stable");

    Ok(())
}
