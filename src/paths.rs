//! Dotted path enumeration over a schema's field tree.
//!
//! Walks confique's `Meta` descriptor recursively. Fields marked
//! `#[config(nested)]` are descended into; every other field is a leaf,
//! whatever its Rust type. Section names themselves never become paths.

use confique::meta::{FieldKind, Meta};

/// Collect every leaf path of `meta` in field declaration order.
///
/// Returns dotted paths like `"key_00"` and `"key_02.subkey_01"`. The order is
/// stable across calls, so callers can use it for generated documentation.
pub fn collect_paths(meta: &Meta) -> Vec<String> {
    let mut paths = Vec::new();
    collect(meta, "", &mut paths);
    paths
}

fn collect(meta: &Meta, prefix: &str, paths: &mut Vec<String>) {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { .. } => paths.push(dotted),
            FieldKind::Nested { meta, .. } => collect(meta, &dotted, paths),
        }
    }
}

/// Names of the schema's first-level fields, leaves and sections alike.
pub fn top_level_fields(meta: &Meta) -> Vec<&'static str> {
    meta.fields.iter().map(|f| f.name).collect()
}
