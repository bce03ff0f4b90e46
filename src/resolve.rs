//! Core resolution pipeline: merge all config layers and produce a typed config.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Start from an empty mapping (defaults are filled during validation)
//! 2. Apply the config file, section by section
//! 3. Apply env vars, lowercase-dotted names first, then uppercase
//! 4. Apply CLI arguments on top (highest priority)
//! 5. Validate the merged mapping into `C`
//!
//! A broken file is logged and contributes nothing; only validation errors
//! reach the caller.

use std::path::PathBuf;

use confique::Config;
use confique::meta::Meta;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::env;
use crate::error::LayerconfError;
use crate::file;
use crate::overrides;
use crate::validate;

/// All pre-loaded data needed to resolve a config. No I/O happens here.
#[derive(Debug, Clone, Default)]
pub struct ResolveInput {
    /// Application name used for env var names.
    pub app_name: String,
    /// Config file path and contents. `None` when there is no file (or it was
    /// disabled or unreadable).
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// CLI arguments as `(dotted_path, value)` pairs. `None` means "not given".
    pub cli_args: Vec<(String, Option<Value>)>,
    /// Whether to reject keys the schema doesn't know.
    pub strict: bool,
}

/// Build the merged mapping for `meta` from every layer, lowest priority first.
pub fn merge_layers(meta: &Meta, input: &ResolveInput) -> Map<String, Value> {
    let mut mapping = Map::new();

    if let Some((path, content)) = &input.file {
        match file::apply(&mut mapping, meta, path, content) {
            Ok(written) => debug!(file = %path.display(), written, "applied config file"),
            Err(e) => warn!(file = %path.display(), error = %e, "ignoring config file"),
        }
    }

    let written = env::apply(
        &mut mapping,
        &input.app_name,
        meta,
        input.env_vars.iter().cloned(),
    );
    debug!(written, "applied environment");

    let written = overrides::apply(&mut mapping, &input.cli_args);
    debug!(written, "applied CLI arguments");

    mapping
}

/// Resolve configuration from pre-loaded inputs.
pub fn resolve<C: Config>(input: ResolveInput) -> Result<C, LayerconfError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mapping = merge_layers(&C::META, &input);
    validate::validate(mapping, input.strict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{RequiredConfig, TestConfig, TypedConfig};
    use serde_json::json;

    fn input() -> ResolveInput {
        ResolveInput {
            app_name: "app_name".into(),
            ..ResolveInput::default()
        }
    }

    fn with_file(content: &str) -> Option<(PathBuf, String)> {
        Some(("/test/config.json".into(), content.into()))
    }

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn cli(pairs: &[(&str, Option<&str>)]) -> Vec<(String, Option<Value>)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(|s| json!(s))))
            .collect()
    }

    #[test]
    fn defaults_only() {
        let config: TestConfig = resolve(input()).unwrap();
        assert_eq!(config.key_00, "layer_01_value_00");
        assert_eq!(config.key_01, "layer_01_value_01");
        assert_eq!(config.key_02.subkey_01, "layer_01_value_02_01");
        assert_eq!(config.key_03.subkey_01.subsubkey_01, "layer_01_value_03_01_01");
    }

    #[test]
    fn cli_only() {
        let config: TestConfig = resolve(ResolveInput {
            cli_args: cli(&[
                ("key_00", Some("cli_value")),
                ("key_02.subkey_01", Some("cli_nested")),
            ]),
            ..input()
        })
        .unwrap();
        assert_eq!(config.key_00, "cli_value");
        assert_eq!(config.key_02.subkey_01, "cli_nested");
        assert_eq!(config.key_01, "layer_01_value_01");
        assert_eq!(config.key_02.subkey_02, "layer_01_value_02_02");
        assert_eq!(config.key_03.subkey_00.subsubkey_00, "layer_01_value_03_00_00");
    }

    #[test]
    fn env_and_file() {
        let config: TestConfig = resolve(ResolveInput {
            file: with_file(r#"{"key_02": {"subkey_02": "file_nested"}}"#),
            env_vars: env(&[
                ("app_name.key_00", "env_value"),
                ("APP_NAME_KEY_02_SUBKEY_02", "upper_nested"),
            ]),
            ..input()
        })
        .unwrap();
        assert_eq!(config.key_00, "env_value");
        assert_eq!(config.key_02.subkey_02, "upper_nested");
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let config: TestConfig = resolve(ResolveInput {
            file: with_file("invalid json"),
            ..input()
        })
        .unwrap();
        assert_eq!(config, resolve::<TestConfig>(input()).unwrap());
    }

    #[test]
    fn full_stack() {
        let config: TestConfig = resolve(ResolveInput {
            file: with_file(r#"{"key_02": {"subkey_01": "file_override"}}"#),
            env_vars: env(&[
                ("app_name.key_01", "env_override"),
                ("APP_NAME_KEY_02_SUBKEY_02", "env_upper"),
            ]),
            cli_args: cli(&[
                ("key_00", Some("cli_override")),
                ("key_02.subkey_01", Some("cli_nested")),
            ]),
            ..input()
        })
        .unwrap();
        assert_eq!(config.key_00, "cli_override");
        assert_eq!(config.key_01, "env_override");
        assert_eq!(config.key_02.subkey_01, "cli_nested");
        assert_eq!(config.key_02.subkey_02, "env_upper");
        assert_eq!(config.key_02.subkey_03, "layer_01_value_02_03");
    }

    #[test]
    fn precedence_at_one_path() {
        let base = ResolveInput {
            file: with_file(r#"{"key_02": {"subkey_01": "file"}}"#),
            ..input()
        };
        let resolved = |input: ResolveInput| resolve::<TestConfig>(input).unwrap().key_02.subkey_01;

        assert_eq!(resolved(input()), "layer_01_value_02_01");
        assert_eq!(resolved(base.clone()), "file");

        let lower = ResolveInput {
            env_vars: env(&[("app_name.key_02.subkey_01", "lower")]),
            ..base.clone()
        };
        assert_eq!(resolved(lower.clone()), "lower");

        let upper = ResolveInput {
            env_vars: env(&[
                ("APP_NAME_KEY_02_SUBKEY_01", "upper"),
                ("app_name.key_02.subkey_01", "lower"),
            ]),
            ..base
        };
        assert_eq!(resolved(upper.clone()), "upper");

        let cli_wins = ResolveInput {
            cli_args: cli(&[("key_02.subkey_01", Some("cli"))]),
            ..upper
        };
        assert_eq!(resolved(cli_wins), "cli");
    }

    #[test]
    fn unset_cli_does_not_override_but_empty_does() {
        let base = ResolveInput {
            env_vars: env(&[("APP_NAME_KEY_00", "from_env")]),
            ..input()
        };
        let unset: TestConfig = resolve(ResolveInput {
            cli_args: cli(&[("key_00", None)]),
            ..base.clone()
        })
        .unwrap();
        assert_eq!(unset.key_00, "from_env");

        let empty: TestConfig = resolve(ResolveInput {
            cli_args: cli(&[("key_00", Some(""))]),
            ..base
        })
        .unwrap();
        assert_eq!(empty.key_00, "");
    }

    #[test]
    fn resolving_twice_is_identical() {
        let make = || ResolveInput {
            file: with_file(r#"{"key_03": {"subkey_01": {"subsubkey_00": "file"}}}"#),
            env_vars: env(&[("APP_NAME_KEY_01", "env")]),
            ..input()
        };
        let first: TestConfig = resolve(make()).unwrap();
        let second: TestConfig = resolve(make()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn merge_layers_leaves_defaults_out() {
        let mapping = merge_layers(&TestConfig::META, &input());
        assert!(mapping.is_empty());
    }

    #[test]
    fn env_strings_are_coerced() {
        let config: TypedConfig = resolve(ResolveInput {
            app_name: "MyApp".into(),
            env_vars: env(&[("MYAPP_PORT", "5000"), ("myapp.debug", "yes")]),
            cli_args: cli(&[("database.pool_size", Some("12"))]),
            ..ResolveInput::default()
        })
        .unwrap();
        assert_eq!(config.port, 5000);
        assert!(config.debug);
        assert_eq!(config.database.pool_size, 12);
    }

    #[test]
    fn bad_type_names_failing_path() {
        let err = resolve::<TypedConfig>(ResolveInput {
            app_name: "MyApp".into(),
            env_vars: env(&[("MYAPP_PORT", "not-a-port")]),
            ..ResolveInput::default()
        })
        .unwrap_err();
        assert_eq!(err.failing_paths(), vec!["port".to_string()]);
    }

    #[test]
    fn missing_required_after_all_layers() {
        let err = resolve::<RequiredConfig>(ResolveInput {
            app_name: "req".into(),
            ..ResolveInput::default()
        })
        .unwrap_err();
        assert!(matches!(err, LayerconfError::MissingValues(_)));
        assert_eq!(err.failing_paths(), vec!["token", "auth.user"]);
    }

    #[test]
    fn required_supplied_by_layers() {
        let config: RequiredConfig = resolve(ResolveInput {
            app_name: "req".into(),
            file: with_file(r#"{"auth": {"user": "alice"}}"#),
            env_vars: env(&[("REQ_TOKEN", "secret")]),
            ..ResolveInput::default()
        })
        .unwrap();
        assert_eq!(config.token, "secret");
        assert_eq!(config.auth.user, "alice");
        assert_eq!(config.level, "info");
    }

    #[test]
    fn unknown_cli_path_permissive_by_default() {
        let config: TestConfig = resolve(ResolveInput {
            cli_args: cli(&[("not_a_field", Some("x"))]),
            ..input()
        })
        .unwrap();
        assert_eq!(config.key_00, "layer_01_value_00");
    }

    #[test]
    fn unknown_cli_path_rejected_when_strict() {
        let err = resolve::<TestConfig>(ResolveInput {
            cli_args: cli(&[("not_a_field", Some("x"))]),
            strict: true,
            ..input()
        })
        .unwrap_err();
        assert_eq!(err.failing_paths(), vec!["not_a_field".to_string()]);
    }
}
