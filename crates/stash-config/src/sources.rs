//! Value sources for config resolution: the persisted config file and a
//! snapshot of the process environment.
//!
//! The file layer is the structured TOML form of `Stash.conf`. Section
//! tables are cosmetic grouping only: every top-level table is flattened
//! into a single key namespace, matching how config sets address fields
//! by bare name. Migrated legacy files keep their original section
//! headers, so flattening cannot be restricted to the canonical names.
//!
//! The environment layer is an owned snapshot, so resolution is
//! deterministic within one call and tests can inject environments
//! without touching the real process env.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    file: BTreeMap<String, toml::Value>,
    env: BTreeMap<String, String>,
}

impl ConfigSources {
    /// No file, no environment. Resolution sees schema defaults only.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build sources from explicit maps. Used by tests and by callers
    /// that manage their own environment snapshots.
    pub fn new(file: BTreeMap<String, toml::Value>, env: BTreeMap<String, String>) -> Self {
        Self { file, env }
    }

    /// Load the config file (if present) and snapshot the real process
    /// environment.
    ///
    /// The file must already be in the structured format; run
    /// [`crate::migrate::ensure_structured`] first.
    pub fn from_process(config_file: Option<&Path>) -> Result<Self> {
        let file = match config_file {
            Some(path) if path.is_file() => load_config_file(path)?,
            _ => BTreeMap::new(),
        };
        let env = std::env::vars().collect();
        Ok(Self { file, env })
    }

    /// Re-snapshot the process environment, keeping the file layer.
    ///
    /// Called after `update_in_place` writes overrides into the process
    /// environment.
    pub fn refresh_env(&mut self) {
        self.env = std::env::vars().collect();
    }

    pub fn file_value(&self, key: &str) -> Option<&toml::Value> {
        self.file.get(key)
    }

    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Override one environment entry in this snapshot.
    pub fn set_env(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.env.insert(key.into(), value.into());
    }
}

/// Parse the structured config file into a flat key namespace.
///
/// Every section table is flattened; a key appearing in several
/// sections resolves to the lexically-later section's value (later
/// values override earlier ones from the same key).
pub fn load_config_file(path: &Path) -> Result<BTreeMap<String, toml::Value>> {
    let content =
        std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| ConfigError::FileFormat {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    tracing::debug!(?path, "Loaded structured config file");

    let mut flat = BTreeMap::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(section) => {
                for (inner_key, inner_value) in section {
                    flat.insert(inner_key, inner_value);
                }
            }
            other => {
                flat.insert(key, other);
            }
        }
    }
    Ok(flat)
}
