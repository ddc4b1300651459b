//! Unknown keys, the generic value tree, and the geon! macro.
//!
//! Run with: cargo run --example extensions

use geon::{generate, geon, parse, parse_value, Value};
use std::error::Error;

const DOCUMENT: &str = "\
PLACE: Tidal Basin
TYPE: infrastructure
LOCATION: 50.3625, -4.1420
TIDES:
  high: 06:12
  ranges:
    - neap
    - spring
MOORINGS: 40
";

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    // The generic tree keeps everything, recognized or not
    let tree = parse_value(DOCUMENT)?;
    println!("Generic tree as JSON:\n{}\n", serde_json::to_string_pretty(&tree)?);

    // Unknown keys land in the extension bag
    let mut place = parse(DOCUMENT)?;
    for (key, value) in &place.extensions {
        println!("Extension {}: {}", key, value);
    }

    if let Some(Value::Map(tides)) = place.extensions.get("TIDES") {
        if let Some(ranges) = tides.get("ranges").and_then(Value::as_list) {
            println!("Tide ranges: {} kinds", ranges.len());
        }
    }

    // Add structured data built with the macro
    place.extensions.insert(
        "BERTHS".to_string(),
        geon!({
            "visitor": ["A1", "A2"],
            "fuel": { "diesel": "yes", "petrol": "no" }
        }),
    );

    let text = generate(&place);
    println!("\nWith new extension:\n{}", text);

    assert_eq!(parse(&text)?, place);
    println!("✓ Extensions survive the round trip");

    Ok(())
}
