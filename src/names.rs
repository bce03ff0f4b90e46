//! Naming conventions derived from dotted config paths.
//!
//! Every leaf path has two environment variable names and one CLI flag:
//!
//! | Config path        | Lowercase dotted env      | Uppercase env               | CLI flag              |
//! |--------------------|---------------------------|-----------------------------|-----------------------|
//! | `key_00`           | `app_name.key_00`         | `APP_NAME_KEY_00`           | `--key_00`            |
//! | `key_02.subkey_01` | `app_name.key_02.subkey_01` | `APP_NAME_KEY_02_SUBKEY_01` | `--key_02__subkey_01` |
//!
//! The uppercase form joins with single underscores, so a field name that
//! itself contains underscores can in principle alias another path (e.g.
//! `a_b.c` and `a.b_c`). Schemas are expected to avoid such pairs; nothing
//! here detects them.

use std::collections::HashMap;

use confique::meta::Meta;

use crate::paths::collect_paths;

/// `app_name.key_02.subkey_01`
pub fn lower_env_name(app_name: &str, path: &str) -> String {
    format!("{}.{path}", app_name.to_lowercase())
}

/// `APP_NAME_KEY_02_SUBKEY_01`
pub fn upper_env_name(app_name: &str, path: &str) -> String {
    format!(
        "{}_{}",
        app_name.to_uppercase(),
        path.replace('.', "_").to_uppercase()
    )
}

/// CLI flag name (without the leading `--`) for a dotted path.
pub fn cli_flag(path: &str) -> String {
    path.replace('.', "__")
}

/// Inverse of [`cli_flag`]: `key_02__subkey_01` becomes `key_02.subkey_01`.
pub fn path_from_flag(flag: &str) -> String {
    flag.replace("__", ".")
}

/// Lowercase dotted env name to dotted path, for every leaf of `meta`.
pub fn lower_mappings(app_name: &str, meta: &Meta) -> HashMap<String, String> {
    collect_paths(meta)
        .into_iter()
        .map(|path| (lower_env_name(app_name, &path), path))
        .collect()
}

/// Uppercase underscored env name to dotted path, for every leaf of `meta`.
pub fn upper_mappings(app_name: &str, meta: &Meta) -> HashMap<String, String> {
    collect_paths(meta)
        .into_iter()
        .map(|path| (upper_env_name(app_name, &path), path))
        .collect()
}
