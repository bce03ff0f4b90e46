use std::collections::HashSet;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::docs::{self, MappingRow};
use crate::error::LayerconfError;
use crate::file;
use crate::flatten;
use crate::names::path_from_flag;
use crate::overrides;
use crate::paths::collect_paths;
use crate::resolve::{self, ResolveInput};
use crate::validate;

/// Entry point for building a layerconf configuration.
pub struct Layerconf;

impl Layerconf {
    pub fn builder<C: Config>() -> LayerconfBuilder<C> {
        LayerconfBuilder::new()
    }
}

/// A schema that knows its own application name.
///
/// Implementing this trait gives the schema one-call loading and
/// documentation helpers:
///
/// ```ignore
/// impl AppConfig for Settings {
///     const APP_NAME: &'static str = "myapp";
/// }
///
/// let settings = Settings::load_config(&[("server.port", Some("9000"))])?;
/// ```
pub trait AppConfig: Config + Sized {
    /// Prefix for env var names and the config directory name.
    const APP_NAME: &'static str;

    /// A builder with the app name already set.
    fn layered() -> LayerconfBuilder<Self> {
        Layerconf::builder::<Self>().app_name(Self::APP_NAME)
    }

    /// Load from the user's config file, the process environment and the
    /// given CLI arguments.
    fn load_config(cli_args: &[(&str, Option<&str>)]) -> Result<Self, LayerconfError>
    where
        Self::Layer: for<'de> Deserialize<'de>,
    {
        Self::layered().load_config(cli_args)
    }

    fn mapping_rows() -> Result<Vec<MappingRow>, LayerconfError>
    where
        Self: Serialize,
        Self::Layer: for<'de> Deserialize<'de>,
    {
        Self::layered().mapping_rows()
    }

    fn markdown() -> Result<String, LayerconfError>
    where
        Self: Serialize,
        Self::Layer: for<'de> Deserialize<'de>,
    {
        Self::layered().markdown()
    }

    fn write_markdown(path: &Path) -> Result<(), LayerconfError>
    where
        Self: Serialize,
        Self::Layer: for<'de> Deserialize<'de>,
    {
        Self::layered().write_markdown(path)
    }

    /// Pretty-printed JSON with `indent` spaces per level.
    fn to_json(&self, indent: usize) -> Result<String, LayerconfError>
    where
        Self: Serialize,
    {
        let spaces = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(spaces.as_bytes());
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser).map_err(LayerconfError::Serialize)?;
        String::from_utf8(buf)
            .map_err(|e| LayerconfError::Serialize(serde::ser::Error::custom(e)))
    }

    /// The CLI parser for this schema.
    #[cfg(feature = "clap")]
    fn command() -> clap::Command {
        crate::cli::build_command(Self::APP_NAME, &Self::META)
    }

    /// Parse `std::env::args()` and load. On a parse error (including
    /// `--help`) clap prints its message and exits the process.
    #[cfg(feature = "clap")]
    fn parse_args() -> Result<Self, LayerconfError>
    where
        Self::Layer: for<'de> Deserialize<'de>,
    {
        let matches = Self::command().get_matches();
        Self::layered()
            .cli_args(crate::cli::cli_args_from_matches(&matches, &Self::META))
            .load()
    }

    /// Parse the given argument list (first item is the binary name) and load.
    #[cfg(feature = "clap")]
    fn parse_args_from<I, T>(args: I) -> Result<Self, LayerconfError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
        Self::Layer: for<'de> Deserialize<'de>,
    {
        Self::layered().parse_args_from(args)
    }
}

/// Builder for configuring and loading layered configuration.
///
/// Precedence, lowest to highest: schema defaults, config file, lowercase-dotted
/// env vars, uppercase env vars, CLI arguments.
pub struct LayerconfBuilder<C: Config> {
    app_name: Option<String>,
    home_dir: Option<PathBuf>,
    config_file: Option<PathBuf>,
    file_enabled: bool,
    env_enabled: bool,
    env_vars: Option<Vec<(String, String)>>,
    strict: bool,
    cli_args: Vec<(String, Option<Value>)>,
    pending_error: Option<LayerconfError>,
    _phantom: PhantomData<C>,
}

impl<C: Config> LayerconfBuilder<C> {
    fn new() -> Self {
        Self {
            app_name: None,
            home_dir: None,
            config_file: None,
            file_enabled: true,
            env_enabled: true,
            env_vars: None,
            strict: false,
            cli_args: Vec::new(),
            pending_error: None,
            _phantom: PhantomData,
        }
    }

    /// Set the application name. This derives:
    /// - the config file `<home>/.config/<app_name lowercased>/config.json`
    /// - env var names `app_name.<path>` and `APP_NAME_<PATH>`
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Use `dir` instead of the user's home directory as the root of the
    /// config file convention.
    pub fn home_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(dir.into());
        self
    }

    /// Read this exact file instead of the conventional location.
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Skip the config file layer.
    pub fn no_file(mut self) -> Self {
        self.file_enabled = false;
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Read env vars from `vars` instead of the process environment.
    pub fn env_vars<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect());
        self
    }

    /// Enable or disable strict mode (default: `false`).
    /// In strict mode, keys the schema doesn't know produce errors.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Add a CLI argument by dotted path. `None` means the option wasn't given
    /// and leaves lower layers alone.
    pub fn cli_arg<V: Into<Value>>(mut self, path: &str, value: Option<V>) -> Self {
        self.cli_args.push((path.to_string(), value.map(Into::into)));
        self
    }

    /// Add several CLI arguments. Later entries win over earlier ones.
    pub fn cli_args<K, V>(mut self, args: impl IntoIterator<Item = (K, Option<V>)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.cli_args.extend(
            args.into_iter()
                .map(|(path, value)| (path.into(), value.map(Into::into))),
        );
        self
    }

    /// Add CLI arguments from any serializable source, auto-matching by field name.
    ///
    /// Serializes `source` into flat key-value pairs, turns `__` into `.`, skips
    /// `None` values, and keeps only keys that match config paths in `C`.
    /// Non-matching keys are silently ignored, so parser-only fields like
    /// `command` or `verbose` are automatically excluded.
    ///
    /// Works with clap-derived structs, `HashMap`s, or anything implementing `Serialize`.
    pub fn cli_args_from<S: Serialize>(mut self, source: &S) -> Self {
        match flatten::flatten_serialize(source) {
            Ok(pairs) => {
                let known: HashSet<String> = collect_paths(&C::META).into_iter().collect();
                let normalized = pairs
                    .into_iter()
                    .map(|(key, value)| (path_from_flag(&key), value));
                self.cli_args
                    .extend(overrides::retain_known(normalized, &known));
            }
            Err(e) => {
                self.pending_error.get_or_insert(e);
            }
        }
        self
    }

    /// Resolve the effective app name, or error if not set.
    fn effective_app_name(&self) -> Result<&str, LayerconfError> {
        self.app_name
            .as_deref()
            .ok_or(LayerconfError::AppNameRequired)
    }

    /// Resolve the effective config file path (`None` if the file layer is
    /// disabled or no home directory is known).
    fn effective_config_file(&self) -> Result<Option<PathBuf>, LayerconfError> {
        if !self.file_enabled {
            return Ok(None);
        }
        if let Some(path) = &self.config_file {
            return Ok(Some(path.clone()));
        }
        let app = self.effective_app_name()?;
        Ok(match &self.home_dir {
            Some(home) => Some(file::config_file_in(home, app)),
            None => file::default_config_file(app),
        })
    }

    /// Read the config file. Anything short of a readable file means no file
    /// layer.
    fn read_file(&self) -> Result<Option<(PathBuf, String)>, LayerconfError> {
        let Some(path) = self.effective_config_file()? else {
            debug!("config file layer disabled or no home directory");
            return Ok(None);
        };
        Ok(match file::read_config_file(&path) {
            Ok(Some(content)) => Some((path, content)),
            Ok(None) => {
                debug!(file = %path.display(), "no config file");
                None
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable config file");
                None
            }
        })
    }

    /// Build the `ResolveInput` from current builder state.
    fn build_input(&self) -> Result<ResolveInput, LayerconfError> {
        let app_name = self.effective_app_name()?.to_string();
        let file = self.read_file()?;
        let env_vars = match (&self.env_vars, self.env_enabled) {
            (_, false) => Vec::new(),
            (Some(vars), true) => vars.clone(),
            (None, true) => std::env::vars().collect(),
        };

        Ok(ResolveInput {
            app_name,
            file,
            env_vars,
            cli_args: self.cli_args.clone(),
            strict: self.strict,
        })
    }

    /// Load and resolve the configuration through all layers.
    pub fn load(mut self) -> Result<C, LayerconfError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        if let Some(e) = self.pending_error.take() {
            return Err(e);
        }
        let input = self.build_input()?;
        resolve::resolve(input)
    }

    /// Add `cli_args` and load.
    pub fn load_config(self, cli_args: &[(&str, Option<&str>)]) -> Result<C, LayerconfError>
    where
        C::Layer: for<'de> Deserialize<'de>,
    {
        self.cli_args(cli_args.iter().copied()).load()
    }

    /// Parse `args` (first item is the binary name) with the schema's CLI
    /// parser, add the result as CLI arguments and load.
    #[cfg(feature = "clap")]
    pub fn parse_args_from<I, T>(self, args: I) -> Result<C, LayerconfError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
        C::Layer: for<'de> Deserialize<'de>,
    {
        let command = crate::cli::build_command(self.effective_app_name()?, &C::META);
        let matches = command.try_get_matches_from(args)?;
        self.cli_args(crate::cli::cli_args_from_matches(&matches, &C::META))
            .load()
    }

    /// One documentation row per config path, with defaults taken from a
    /// config resolved from defaults alone.
    pub fn mapping_rows(&self) -> Result<Vec<MappingRow>, LayerconfError>
    where
        C: Serialize,
        C::Layer: for<'de> Deserialize<'de>,
    {
        let app_name = self.effective_app_name()?;
        let defaults = defaults_dump::<C>()?;
        Ok(docs::mapping_rows(app_name, &C::META, &defaults))
    }

    /// The mapping table as a markdown document.
    pub fn markdown(&self) -> Result<String, LayerconfError>
    where
        C: Serialize,
        C::Layer: for<'de> Deserialize<'de>,
    {
        let rows = self.mapping_rows()?;
        Ok(docs::render_markdown(self.effective_app_name()?, &rows))
    }

    pub fn write_markdown(&self, path: &Path) -> Result<(), LayerconfError>
    where
        C: Serialize,
        C::Layer: for<'de> Deserialize<'de>,
    {
        let rows = self.mapping_rows()?;
        docs::write_markdown(path, self.effective_app_name()?, &rows)
    }
}

/// Nested dump of `C` resolved from defaults alone. A schema with required
/// fields has no such config; its declared defaults are used instead.
fn defaults_dump<C>() -> Result<Map<String, Value>, LayerconfError>
where
    C: Config + Serialize,
    C::Layer: for<'de> Deserialize<'de>,
{
    let config = match validate::validate::<C>(Map::new(), false) {
        Ok(config) => config,
        Err(LayerconfError::MissingValues(paths)) => {
            debug!(?paths, "required fields have no default");
            return docs::schema_defaults(&C::META);
        }
        Err(e) => return Err(e),
    };
    match serde_json::to_value(&config).map_err(LayerconfError::Serialize)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
