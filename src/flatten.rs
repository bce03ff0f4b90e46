//! Flatten nested JSON mappings into dotted key-value pairs.
//!
//! The inverse of [`set_nested`](crate::nested::set_nested): walks a mapping
//! depth-first and emits one `(dotted_path, value)` pair per non-object value,
//! keeping each level's own key order.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::LayerconfError;

/// Flatten a nested mapping into ordered dotted key-value pairs.
///
/// `{"a": 1, "b": {"c": 2}}` → `[("a", 1), ("b.c", 2)]`. Empty sub-mappings
/// contribute nothing; `null` leaves are emitted as-is.
pub fn flatten(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(map, "", &mut out);
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in map {
        let path = dotted(prefix, key);
        match value {
            Value::Object(inner) => flatten_into(inner, &path, out),
            other => out.push((path, other.clone())),
        }
    }
}

fn dotted(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Serialize `source` to JSON and flatten it.
///
/// Structs and maps become dotted paths; `Option::None` fields become `null`
/// leaves. A source that does not serialize to an object yields no pairs.
pub fn flatten_serialize<S: Serialize>(source: &S) -> Result<Vec<(String, Value)>, LayerconfError> {
    match serde_json::to_value(source).map_err(LayerconfError::Serialize)? {
        Value::Object(map) => Ok(flatten(&map)),
        _ => Ok(vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn flattens_mixed_depths() {
        let map = object(json!({"a": "value_a", "b": {"c": "value_c", "d": {"e": "value_e"}}}));
        assert_eq!(
            flatten(&map),
            vec![
                ("a".into(), json!("value_a")),
                ("b.c".into(), json!("value_c")),
                ("b.d.e".into(), json!("value_e")),
            ]
        );
    }

    #[test]
    fn preserves_insertion_order() {
        let map = object(json!({"zeta": 1, "alpha": {"y": 2, "b": 3}, "mid": 4}));
        let keys: Vec<String> = flatten(&map).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["zeta", "alpha.y", "alpha.b", "mid"]);
    }

    #[test]
    fn null_leaf_is_emitted() {
        let map = object(json!({"url": null}));
        assert_eq!(flatten(&map), vec![("url".into(), Value::Null)]);
    }

    #[test]
    fn empty_sub_mapping_contributes_nothing() {
        let map = object(json!({"a": {}, "b": 1}));
        assert_eq!(flatten(&map), vec![("b".into(), json!(1))]);
    }

    #[test]
    fn arrays_are_leaves() {
        let map = object(json!({"tags": ["a", "b"]}));
        assert_eq!(flatten(&map), vec![("tags".into(), json!(["a", "b"]))]);
    }

    #[test]
    fn serialize_struct_with_options() {
        #[derive(Serialize)]
        struct Inner {
            url: Option<String>,
        }
        #[derive(Serialize)]
        struct Args {
            host: Option<String>,
            port: u16,
            database: Inner,
        }
        let args = Args {
            host: None,
            port: 3000,
            database: Inner {
                url: Some("pg://".into()),
            },
        };
        assert_eq!(
            flatten_serialize(&args).unwrap(),
            vec![
                ("host".into(), Value::Null),
                ("port".into(), json!(3000)),
                ("database.url".into(), json!("pg://")),
            ]
        );
    }

    #[test]
    fn serialize_map_input() {
        let mut map = BTreeMap::new();
        map.insert("host".to_string(), "0.0.0.0".to_string());
        assert_eq!(
            flatten_serialize(&map).unwrap(),
            vec![("host".into(), json!("0.0.0.0"))]
        );
    }

    #[test]
    fn serialize_non_object_is_empty() {
        assert!(flatten_serialize(&42).unwrap().is_empty());
    }
}
