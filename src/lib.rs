//! Layered configuration for Rust applications. Define a struct, name your
//! app, and go.
//!
//! Layerconf resolves a typed configuration from four sources: the struct's
//! compiled defaults, a JSON config file, environment variables, and CLI
//! arguments. Built on [confique](https://docs.rs/confique) for struct-driven
//! defaults and field metadata.
//!
//! ```ignore
//! #[derive(Config, Serialize, Deserialize)]
//! struct Settings {
//!     #[config(default = "localhost")]
//!     host: String,
//!     #[config(nested)]
//!     database: DatabaseSettings,
//! }
//!
//! impl AppConfig for Settings {
//!     const APP_NAME: &'static str = "myapp";
//! }
//!
//! let settings = Settings::load_config(&[("database.url", Some("pg://localhost"))])?;
//! ```
//!
//! That single call reads `~/.config/myapp/config.json`, applies `myapp.*`
//! and `MYAPP_*` environment variables, applies the given CLI arguments,
//! fills in `#[config(default)]` values, and hands you a typed struct.
//!
//! # Design: struct as source of truth
//!
//! Your config struct (via confique's `Config` derive) is the schema for
//! everything:
//!
//! - **`#[config(default = ...)]`** provides compiled defaults, the lowest
//!   layer.
//! - **`#[config(nested)]`** models hierarchical config. Each leaf gets a
//!   dotted path (`database.url`), and every name below derives from it.
//! - **`Option<T>` fields** are optional. Fields without `Option` and without
//!   a default must be provided by at least one layer or loading fails.
//!
//! The CLI parser ([`AppConfig::command`]) and the mapping table
//! ([`AppConfig::markdown`]) are generated from the same struct, so they
//! can't drift from it.
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Config file           ~/.config/<app>/config.json
//!        ↑ overridden by
//! Lowercase env vars    app_name.key_02.subkey_01
//!        ↑ overridden by
//! Uppercase env vars    APP_NAME_KEY_02_SUBKEY_01
//!        ↑ overridden by
//! CLI arguments         --key_02__subkey_01 / .cli_arg()
//! ```
//!
//! Every layer is **sparse**: it only writes the paths it has a value for,
//! and later layers overwrite earlier ones at exactly those paths.
//!
//! # Config file
//!
//! The file mirrors the struct's first level. Each top-level section's
//! entries are applied at `<section>.<key>`; anything deeper is taken as-is.
//!
//! ```json
//! { "database": { "url": "pg://localhost", "pool_size": 10 } }
//! ```
//!
//! A missing, unreadable or malformed file is logged and skipped; it never
//! fails the load.
//!
//! # Environment variables
//!
//! Each leaf path has two names. For app `myapp` and path `database.url`:
//!
//! | Env var | Config path |
//! |---------|-------------|
//! | `myapp.database.url` | `database.url` |
//! | `MYAPP_DATABASE_URL` | `database.url` |
//!
//! When both are set, the uppercase one wins. Values arrive as strings and
//! are coerced during validation: `"8080"` becomes a `u16`, `"yes"` a `bool`.
//!
//! # CLI arguments
//!
//! CLI arguments are a flat list of `(dotted_path, Option<value>)`. `None`
//! means "not given" and never hides a lower layer; an empty string is a value.
//! With the `clap` feature (on by default), [`AppConfig::command`] builds a
//! parser with one `--<path>` option per leaf, nested levels joined by `__`.
//!
//! [`cli_args_from()`](LayerconfBuilder::cli_args_from) takes any
//! serializable struct and keeps only fields that name config paths, so a
//! clap derive struct with extra flags can be passed whole.
//!
//! # Strict mode
//!
//! Off by default: keys the struct doesn't know are ignored. With
//! [`.strict(true)`](LayerconfBuilder::strict), they fail the load with
//! [`LayerconfError::UnknownKeys`].
//!
//! # Logging
//!
//! Layerconf logs through [`tracing`](https://docs.rs/tracing): skipped
//! files at `warn`, per-layer counts at `debug`. It never installs a
//! subscriber.
//!
//! # Error handling
//!
//! All fallible operations return [`LayerconfError`]. Validation errors carry
//! the dotted paths that failed ([`LayerconfError::failing_paths`]).

pub mod docs;
pub mod error;
pub mod flatten;
pub mod names;
pub mod nested;
pub mod paths;
pub mod resolve;

mod builder;
#[cfg(feature = "clap")]
mod cli;
mod env;
mod file;
mod overrides;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::{AppConfig, Layerconf, LayerconfBuilder};
#[cfg(feature = "clap")]
pub use cli::{build_command, cli_args_from_matches};
pub use docs::MappingRow;
pub use error::LayerconfError;
pub use file::{config_file_in, default_config_file};
pub use paths::collect_paths;
pub use validate::validate;
