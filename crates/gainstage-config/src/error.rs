//! Config loading and saving errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationError;

/// Why an [`EngineConfig`](crate::EngineConfig) could not be loaded or saved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading the config file failed.
    #[error("failed to read config '{path}': {source}")]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing the config file failed.
    #[error("failed to write config '{path}': {source}")]
    WriteFile {
        /// File that was being written.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The config file's parent directory could not be created.
    #[error("failed to create config directory '{path}': {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML, or does not match the config schema.
    #[error("config is not valid TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("config could not be written as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The document parsed but describes an unusable engine.
    #[error("invalid config: {0}")]
    Validation(#[from] ValidationError),
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
