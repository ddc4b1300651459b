//! Places containing places, and the nesting limit.
//!
//! Run with: cargo run --example nested_places

use geon::{generate, parse, parse_with_options, Error, ParseOptions, Place};
use std::error::Error as StdError;

fn district() -> Place {
    let mut square = Place::new("Market Square", "public_space").with_location(52.2053, 0.1218);
    square.purpose = vec!["commerce".to_string()];
    square.contains = vec![
        Place::new("Fountain", "landmark").with_location(52.2054, 0.1219),
        Place::new("Stall Row", "building"),
    ];

    let mut district = Place::new("Historic Core", "district").with_location(52.205, 0.119);
    district.contains = vec![
        square,
        Place::new("Guildhall", "building").with_location(52.2049, 0.1205),
    ];
    district
}

fn print_tree(place: &Place, indent: usize) {
    println!("{}{} ({})", "  ".repeat(indent), place.name, place.category);
    for child in &place.contains {
        print_tree(child, indent + 1);
    }
}

fn main() -> Result<(), Box<dyn StdError>> {
    env_logger::init();

    let place = district();
    let text = generate(&place);
    println!("{}", text);

    let parsed = parse(&text)?;
    assert_eq!(parsed, place);
    println!(
        "Parsed {} places, {} levels deep:",
        parsed.subtree_len(),
        parsed.nesting_depth()
    );
    print_tree(&parsed, 1);

    // Each nested place costs two block levels
    let strict = ParseOptions::new().with_max_depth(3);
    match parse_with_options(&text, &strict) {
        Err(Error::RecursionLimit { limit, line }) => {
            println!("\nWith max_depth {}: stopped at line {}", limit, line);
        }
        Err(e) => return Err(e.into()),
        Ok(_) => println!("\nWith max_depth 3: parsed"),
    }

    Ok(())
}
