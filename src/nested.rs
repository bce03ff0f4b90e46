//! Dotted-path access into a nested JSON mapping.
//!
//! This is the scratch space every layer writes into before validation. Writes
//! never fail: intermediate levels are created on demand, and a non-object value
//! sitting where an intermediate level is needed gets replaced by one.

use serde_json::{Map, Value};

/// Set `value` at `dotted_path`, creating intermediate mappings as needed.
///
/// `("key_02.subkey_01", "x")` on an empty map gives `{"key_02": {"subkey_01": "x"}}`.
/// An existing value at the final segment is overwritten, even if it was a
/// sub-mapping.
pub fn set_nested(map: &mut Map<String, Value>, dotted_path: &str, value: Value) {
    let (parents, leaf) = match dotted_path.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_path),
    };

    let mut current = map;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            let slot = current
                .entry(segment)
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Some(next) = slot.as_object_mut() else {
                return;
            };
            current = next;
        }
    }

    current.insert(leaf.to_string(), value);
}

/// Read the value at `dotted_path`. Missing levels yield `None`.
pub fn get_nested<'a>(map: &'a Map<String, Value>, dotted_path: &str) -> Option<&'a Value> {
    let (parents, leaf) = match dotted_path.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, dotted_path),
    };

    let mut current = map;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            current = current.get(segment)?.as_object()?;
        }
    }

    current.get(leaf)
}
