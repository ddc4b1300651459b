/// Builds a [`Value`](crate::Value) from a JSON-like literal.
///
/// Strings and numbers become scalars, `[...]` a list, `{...}` a mapping
/// with keys kept in the order written.
///
/// # Examples
///
/// ```rust
/// use geon::{geon, Value};
///
/// let tide = geon!({ "high": "06:12", "ranges": ["neap", "spring"] });
/// assert_eq!(tide.to_string(), "high: 06:12, ranges: neap, spring");
/// assert_eq!(geon!(12), Value::Scalar("12".to_string()));
/// ```
#[macro_export]
macro_rules! geon {
    // Empty list
    ([]) => {
        $crate::Value::List(vec![])
    };

    // Non-empty list
    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::List(vec![$($crate::geon!($elem)),*])
    };

    // Empty mapping
    ({}) => {
        $crate::Value::Map($crate::GeonMap::new())
    };

    // Non-empty mapping
    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut map = $crate::GeonMap::new();
        $(
            map.insert($key.to_string(), $crate::geon!($value));
        )*
        $crate::Value::Map(map)
    }};

    // Anything with a `From` conversion into a scalar
    ($s:expr) => {
        $crate::Value::from($s)
    };
}

#[cfg(test)]
mod tests {
    use crate::{GeonMap, Value};

    #[test]
    fn test_geon_macro_scalars() {
        assert_eq!(geon!("quay"), Value::Scalar("quay".to_string()));
        assert_eq!(geon!(42), Value::Scalar("42".to_string()));
        assert_eq!(geon!(3.5), Value::Scalar("3.5".to_string()));
    }

    #[test]
    fn test_geon_macro_lists() {
        assert_eq!(geon!([]), Value::List(vec![]));

        match geon!(["north", "south"]) {
            Value::List(items) => {
                assert_eq!(items.len(), 2);
                assert_eq!(items[1], Value::from("south"));
            }
            _ => panic!("Expected list"),
        }
    }

    #[test]
    fn test_geon_macro_mappings() {
        assert_eq!(geon!({}), Value::Map(GeonMap::new()));

        let value = geon!({
            "surface": "granite setts",
            "levels": { "upper": "gallery", "lower": "market" }
        });

        match value {
            Value::Map(map) => {
                assert_eq!(map.keys().collect::<Vec<_>>(), vec!["surface", "levels"]);
                let levels = map.get("levels").and_then(Value::as_map).unwrap();
                assert_eq!(levels.get("lower"), Some(&Value::from("market")));
            }
            _ => panic!("Expected mapping"),
        }
    }
}
