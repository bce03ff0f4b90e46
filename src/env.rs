use confique::meta::Meta;
use serde_json::{Map, Value};

use crate::names::{lower_mappings, upper_mappings};
use crate::nested::set_nested;

/// Apply the environment layer to `mapping`.
///
/// Two names are recognized per leaf path: `app_name.key_02.subkey_01` and
/// `APP_NAME_KEY_02_SUBKEY_01`. All lowercase-dotted matches are written first,
/// then all uppercase ones, so the uppercase form wins when both are set for
/// the same path. Other variables are ignored. Values are written as strings;
/// the validator coerces them to the schema's types.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
/// Returns the number of values written.
pub fn apply(
    mapping: &mut Map<String, Value>,
    app_name: &str,
    meta: &Meta,
    vars: impl IntoIterator<Item = (String, String)>,
) -> usize {
    let lower = lower_mappings(app_name, meta);
    let upper = upper_mappings(app_name, meta);

    let mut lower_hits = Vec::new();
    let mut upper_hits = Vec::new();
    for (name, value) in vars {
        if let Some(path) = lower.get(&name) {
            lower_hits.push((path, value));
        } else if let Some(path) = upper.get(&name) {
            upper_hits.push((path, value));
        }
    }

    let written = lower_hits.len() + upper_hits.len();
    for (path, value) in lower_hits.into_iter().chain(upper_hits) {
        set_nested(mapping, path, Value::String(value));
    }
    written
}
