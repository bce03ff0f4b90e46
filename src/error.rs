use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayerconfError {
    #[error("Invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Missing required values: {}", .0.join(", "))]
    MissingValues(Vec<String>),

    #[error("Unknown keys in resolved configuration: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] confique::Error),

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Config file {path} does not contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("App name is required: call .app_name() on the builder or implement AppConfig")]
    AppNameRequired,

    #[cfg(feature = "clap")]
    #[error(transparent)]
    Cli(#[from] clap::Error),
}

impl LayerconfError {
    /// Dotted config paths this error is about. Empty for errors that are not
    /// tied to particular fields.
    pub fn failing_paths(&self) -> Vec<String> {
        match self {
            LayerconfError::InvalidValue { path, .. } => vec![path.clone()],
            LayerconfError::MissingValues(paths) | LayerconfError::UnknownKeys(paths) => {
                paths.clone()
            }
            _ => vec![],
        }
    }
}
