//! Error types for stash-config

use std::path::PathBuf;

use crate::schema::ConfigType;

/// Result type for stash-config operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving or migrating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required field got no value from any enabled layer and has no default
    #[error("No value provided for required config field {field}")]
    MissingValue { field: String },

    /// A layer or computed default supplied a value of the wrong type
    #[error("Config field {field} expected {expected} but got {got}")]
    TypeMismatch {
        field: String,
        expected: ConfigType,
        got: String,
    },

    /// Computed defaults reference each other in a loop
    #[error("Default-function cycle between config fields: {}", fields.join(" -> "))]
    DefaultCycle { fields: Vec<String> },

    /// The config file is neither valid structured TOML nor recognizable legacy INI
    #[error("Config file at {path} is not valid TOML or legacy INI: {message}")]
    FileFormat { path: PathBuf, message: String },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fs(#[from] stash_fs::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),
}

impl ConfigError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingValue {
            field: field.into(),
        }
    }

    pub fn mismatch(field: impl Into<String>, expected: ConfigType, got: impl Into<String>) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            got: got.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
