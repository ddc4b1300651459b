use geon::{generate, geon, parse, GeonMap, Place, Value};

#[test]
fn test_geon_macro_scalars() {
    assert_eq!(geon!("cobbles"), Value::Scalar("cobbles".to_string()));
    assert_eq!(geon!(7), Value::Scalar("7".to_string()));
    assert_eq!(geon!(-0.25), Value::Scalar("-0.25".to_string()));

    let owned = String::from("owned");
    assert_eq!(geon!(owned), Value::Scalar("owned".to_string()));
}

#[test]
fn test_geon_macro_trailing_commas() {
    let list = geon!(["a", "b",]);
    assert_eq!(list.as_list().map(Vec::len), Some(2));

    let map = geon!({ "k": "v", });
    assert_eq!(map.as_map().map(GeonMap::len), Some(1));
}

#[test]
fn test_geon_macro_nested() {
    let value = geon!({
        "lines": [
            { "name": "Red", "stops": ["North", "Centre"] },
            { "name": "Blue" }
        ],
        "frequency": { "peak": "5 min", "off_peak": "12 min" }
    });

    let map = value.as_map().unwrap();
    let lines = map.get("lines").and_then(Value::as_list).unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].as_map().and_then(|m| m.get("name")), Some(&geon!("Red")));
    assert_eq!(
        map.get("frequency").and_then(Value::as_map).and_then(|m| m.get("off_peak")),
        Some(&geon!("12 min"))
    );
}

#[test]
fn test_macro_values_as_extensions() {
    let mut place = Place::new("Interchange", "transport_hub");
    place.extensions.insert(
        "SERVICES".to_string(),
        geon!({ "tram": ["1", "2"], "bus": { "night": "N7" } }),
    );
    place.extensions.insert("OPERATOR".to_string(), geon!("City Transit"));

    let text = generate(&place);
    assert!(text.ends_with(
        "SERVICES:\n  tram:\n    - 1\n    - 2\n  bus:\n    night: N7\nOPERATOR: City Transit\n"
    ));
    assert_eq!(parse(&text).unwrap(), place);
}
