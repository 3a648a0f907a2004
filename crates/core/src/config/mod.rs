//! Configuration loading, validation and persistence.
//!
//! Settings live in a TOML file found on a short search path and can be
//! overridden from the environment with `RIPLINE_` variables, using `__` to
//! separate nested keys (`RIPLINE_ENCODE__QUALITY=18`).

mod loader;
mod preset;
mod types;
mod validate;

pub use loader::{
    config_search_paths, find_config, load_config, load_config_from_str, save_config,
    user_config_path, CONFIG_FILE_NAME, ENV_PREFIX,
};
pub use preset::{resolve_preset_file, PresetFile, PresetSummary};
pub use types::*;
pub use validate::validate_config;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found (searched: {})", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    #[error("HandBrake preset file {path}: {reason}")]
    PresetFile { path: PathBuf, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
