//! Build configuration read from `webdsl.toml` beside the root source file.

use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error as ThisError;

/// File name looked up by [`BuildConfig::discover`].
pub const CONFIG_FILE_NAME: &str = "webdsl.toml";

/// Default limit on import nesting.
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 64;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: Box<toml::de::Error>,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// BuildConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub imports: ImportConfig,
    pub overload: OverloadConfig,
}

impl BuildConfig {
    /// Parse configuration text; `path` is only used for error reporting.
    pub fn from_toml_str(text: &str, path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.into(),
            source: Box::new(source),
        })?;
        config.check()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&text, path)
    }

    /// Load `dir/webdsl.toml` when present, otherwise return defaults.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.imports.max_depth == 0 {
            return Err(ConfigError::Invalid(
                "imports.max_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// ImportConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Maximum import nesting below the root file.
    pub max_depth: usize,

    /// Extra directories tried after the importing file's own directory.
    pub search_paths: Vec<PathBuf>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_IMPORT_DEPTH,
            search_paths: Vec::new(),
        }
    }
}

///
/// OverloadConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverloadConfig {
    /// Keep superseded entities in the aggregated entity list.
    pub retain_superseded: bool,
}
