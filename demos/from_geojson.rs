//! Converting between GeoJSON and GEON.
//!
//! Run with: cargo run --example from_geojson

use geon::geojson::{from_geojson_str, to_geojson_string};
use geon::{generate_many, Place};
use std::error::Error;

const COLLECTION: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "id": "node/101",
      "geometry": { "type": "Point", "coordinates": [-1.1505, 52.9536] },
      "properties": { "name": "Council House", "building": "civic", "amenity": "townhall" }
    },
    {
      "type": "Feature",
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-1.151, 52.953], [-1.149, 52.953], [-1.149, 52.954], [-1.151, 52.954], [-1.151, 52.953]]]
      },
      "properties": { "name": "Old Market Square", "place": "square", "leisure": "plaza" }
    },
    {
      "type": "Feature",
      "geometry": { "type": "GeometryCollection", "geometries": [] },
      "properties": { "name": "Unsupported" }
    }
  ]
}"#;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut places: Vec<Place> = Vec::new();
    for result in from_geojson_str(COLLECTION)? {
        match result {
            Ok(place) => places.push(place),
            Err(e) => println!("Skipped feature: {}", e),
        }
    }

    println!("\nAs GEON:\n{}", generate_many(&places));

    if let Some(square) = places.get(1) {
        println!("Back to GeoJSON:\n{}", to_geojson_string(square)?);
    }

    Ok(())
}
