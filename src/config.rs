//! User configuration file handling.
//!
//! An optional `config.toml` supplies defaults for backend, model, and
//! system prompt. Command-line flags and environment variables take
//! precedence over anything read here; the file only fills gaps.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::backend::BackendKind;
use crate::error::{Error, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_VAR: &str = "LLMPIPE_CONFIG";

/// Contents of the optional config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Default backend name, same values as `--backend`.
    pub backend: Option<String>,
    /// Default model passed to the backend.
    pub model: Option<String>,
    /// Default system prompt text.
    pub system: Option<String>,
}

impl FileConfig {
    /// Loads the config file, returning defaults when none exists.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.is_file() => Self::from_path(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Parses a config file at an explicit path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            Error::Config(format!("invalid config file {}: {}", path.display(), e))
        })
    }

    /// Parses the `backend` key into a kind, if present.
    pub fn backend_kind(&self) -> Result<Option<BackendKind>> {
        match &self.backend {
            None => Ok(None),
            Some(name) => <BackendKind as clap::ValueEnum>::from_str(name, true)
                .map(Some)
                .map_err(|_| Error::Config(format!("unknown backend {name:?} in config file"))),
        }
    }
}

/// Resolves the config file path: `LLMPIPE_CONFIG` when set, otherwise the
/// platform config dir.
fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }
    directories::ProjectDirs::from("", "", "llmpipe")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
