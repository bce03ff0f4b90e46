//! Mapping table: one row per config path with its env var names and default.
//!
//! ```text
//! # app_name Config Mappings
//!
//! | Config / CLI Args | Lowercase Dotted Envs. | Uppercase Underscored Envs. | Default Value |
//! | --- | --- | --- | --- |
//! | key_00 | app_name.key_00 | APP_NAME_KEY_00 | "layer_01_value_00" |
//! ```

use std::path::Path;

use confique::meta::{FieldKind, LeafKind, Meta};
use serde_json::{Map, Value};

use crate::error::LayerconfError;
use crate::names::{lower_env_name, upper_env_name};
use crate::nested::{get_nested, set_nested};
use crate::paths::collect_paths;

pub const HEADERS: [&str; 4] = [
    "Config / CLI Args",
    "Lowercase Dotted Envs.",
    "Uppercase Underscored Envs.",
    "Default Value",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub path: String,
    pub lower_env: String,
    pub upper_env: String,
    /// JSON text of the default (`"text"`, `8080`, `null`). Empty when the
    /// schema gives the path no default.
    pub default: String,
}

impl MappingRow {
    fn cells(&self) -> [&str; 4] {
        [&self.path, &self.lower_env, &self.upper_env, &self.default]
    }
}

/// Build one row per leaf path of `meta`, in declaration order.
///
/// `defaults` is the nested dump of a config resolved from defaults alone.
pub fn mapping_rows(app_name: &str, meta: &Meta, defaults: &Map<String, Value>) -> Vec<MappingRow> {
    collect_paths(meta)
        .into_iter()
        .map(|path| MappingRow {
            lower_env: lower_env_name(app_name, &path),
            upper_env: upper_env_name(app_name, &path),
            default: get_nested(defaults, &path)
                .map(Value::to_string)
                .unwrap_or_default(),
            path,
        })
        .collect()
}

/// Defaults declared on the schema itself, as a nested mapping.
///
/// Built from `#[config(default = ...)]` expressions rather than a resolved
/// config, so it also works for schemas with required fields. Optional leaves
/// are `null`; required leaves without a default are absent.
pub fn schema_defaults(meta: &Meta) -> Result<Map<String, Value>, LayerconfError> {
    let mut out = Map::new();
    collect_defaults(meta, "", &mut out)?;
    Ok(out)
}

fn collect_defaults(meta: &Meta, prefix: &str, out: &mut Map<String, Value>) -> Result<(), LayerconfError> {
    for field in meta.fields {
        let dotted = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match &field.kind {
            FieldKind::Leaf { kind: LeafKind::Optional, .. } => {
                set_nested(out, &dotted, Value::Null);
            }
            FieldKind::Leaf {
                kind: LeafKind::Required { default: Some(expr), .. },
                ..
            } => {
                let value = serde_json::to_value(expr).map_err(LayerconfError::Serialize)?;
                set_nested(out, &dotted, value);
            }
            FieldKind::Nested { meta, .. } => collect_defaults(meta, &dotted, out)?,
            _ => {}
        }
    }
    Ok(())
}

/// Render rows as a markdown document headed `# {app_name} Config Mappings`.
pub fn render_markdown(app_name: &str, rows: &[MappingRow]) -> String {
    let mut out = format!("# {app_name} Config Mappings\n\n");
    push_row(&mut out, HEADERS);
    push_row(&mut out, ["---"; 4]);
    for row in rows {
        push_row(&mut out, row.cells());
    }
    out
}

fn push_row(out: &mut String, cells: [&str; 4]) {
    out.push_str("| ");
    out.push_str(&cells.map(|c| c.replace('|', "\\|")).join(" | "));
    out.push_str(" |\n");
}

/// Write the markdown table to `path`, creating parent directories.
pub fn write_markdown(path: &Path, app_name: &str, rows: &[MappingRow]) -> Result<(), LayerconfError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| LayerconfError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    std::fs::write(path, render_markdown(app_name, rows)).map_err(|e| LayerconfError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}
