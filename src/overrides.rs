//! The CLI layer: apply a flat dotted-path mapping on top of everything else.
//!
//! Each `("key_02.subkey_01", Some(value))` entry is written with
//! [`set_nested`]. Entries whose value is `None` (or JSON `null`) are options
//! the user didn't pass; they are skipped so they never clobber a lower layer.
//! An empty string is a value and does override.
//!
//! Paths are not checked against the schema here. Unknown paths are written and
//! the validator decides what to do with them.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::nested::set_nested;

/// Apply CLI entries in order; when an entry repeats a path, the last one wins.
/// Returns the number of values written.
pub fn apply(mapping: &mut Map<String, Value>, entries: &[(String, Option<Value>)]) -> usize {
    let mut written = 0;
    for (dotted_path, value) in entries {
        match value {
            None | Some(Value::Null) => continue,
            Some(v) => {
                set_nested(mapping, dotted_path, v.clone());
                written += 1;
            }
        }
    }
    written
}

/// Keep only entries whose path is one of `known` and whose value is present.
///
/// Used when the flat mapping comes from a source that also carries
/// non-config fields, like a parsed argument struct with its own flags.
pub fn retain_known(
    entries: impl IntoIterator<Item = (String, Value)>,
    known: &HashSet<String>,
) -> Vec<(String, Option<Value>)> {
    entries
        .into_iter()
        .filter(|(path, value)| !value.is_null() && known.contains(path))
        .map(|(path, value)| (path, Some(value)))
        .collect()
}
