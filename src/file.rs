//! Config file location and the file layer.
//!
//! The file lives at `<home>/.config/<app_name lowercased>/config.json`, where
//! `<home>` is the user's home directory unless the builder injects another
//! root. The builder can also point at an explicit file instead.
//!
//! # Format
//!
//! The document mirrors the schema's first level only:
//!
//! ```json
//! { "key_02": { "subkey_01": "file_value" } }
//! ```
//!
//! For each top-level schema field present in the document, each key/value
//! pair beneath it is written at `<section>.<key>`. Values below that second
//! level are opaque: a nested object replaces whatever sat at `<section>.<key>`
//! rather than being merged into it. Top-level keys the schema doesn't know are
//! skipped, as are sections whose value is not an object and `null` values.
//!
//! Failures here (unreadable file, bad JSON, non-object document) are returned
//! as errors; the resolve pipeline logs them and carries on without the layer.

use std::path::{Path, PathBuf};

use confique::meta::Meta;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::LayerconfError;
use crate::nested::set_nested;
use crate::paths::top_level_fields;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// `<home>/.config/<app_name lowercased>/config.json`
pub fn config_file_in(home: &Path, app_name: &str) -> PathBuf {
    home.join(".config")
        .join(app_name.to_lowercase())
        .join(CONFIG_FILE_NAME)
}

/// The conventional config file path under the user's home directory.
///
/// Returns `None` if no home directory can be determined.
pub fn default_config_file(app_name: &str) -> Option<PathBuf> {
    let user = directories::UserDirs::new()?;
    Some(config_file_in(user.home_dir(), app_name))
}

/// Read a config file. A missing file is `Ok(None)`; other I/O errors are returned.
pub fn read_config_file(path: &Path) -> Result<Option<String>, LayerconfError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(LayerconfError::IoError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Apply the file layer to `mapping`.
///
/// The whole document is parsed before anything is written, so a parse
/// failure leaves `mapping` untouched. Returns the number of values written.
pub fn apply(
    mapping: &mut Map<String, Value>,
    meta: &Meta,
    path: &Path,
    content: &str,
) -> Result<usize, LayerconfError> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| LayerconfError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    let Value::Object(mut document) = document else {
        return Err(LayerconfError::NotAnObject {
            path: path.to_path_buf(),
        });
    };

    let mut written = 0;
    for section in top_level_fields(meta) {
        let Some(entries) = document.remove(section) else {
            continue;
        };
        let Value::Object(entries) = entries else {
            debug!(file = %path.display(), section, "skipping non-object section");
            continue;
        };
        for (key, value) in entries {
            if value.is_null() {
                continue;
            }
            set_nested(mapping, &format!("{section}.{key}"), value);
            written += 1;
        }
    }

    Ok(written)
}
