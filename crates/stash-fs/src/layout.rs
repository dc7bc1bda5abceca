//! Well-known paths inside a Stash data directory.
//!
//! Everything Stash writes lives under a single data directory: archived
//! snapshots, logs, caches, and the `lib/` tree where binary providers
//! install tools that are not managed by the host system.

use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Filename of the persisted config file inside the data directory.
pub const CONFIG_FILENAME: &str = "Stash.conf";

/// Filename of the pre-migration backup written next to the config file.
pub const CONFIG_BACKUP_FILENAME: &str = ".Stash.conf.bak";

/// Resolved filesystem layout of a Stash data directory.
///
/// All paths are derived from the data dir root; nothing outside it is
/// touched except the platform browser caches used by playwright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    data_dir: PathBuf,
}

impl DataLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Per-snapshot archive output tree.
    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join("archive")
    }

    pub fn sources_dir(&self) -> PathBuf {
        self.data_dir.join("sources")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir.join("cache")
    }

    pub fn tmp_dir(&self) -> PathBuf {
        self.data_dir.join("tmp")
    }

    /// Root of the tree where providers install project-local tools.
    pub fn lib_dir(&self) -> PathBuf {
        self.data_dir.join("lib")
    }

    /// Manually placed or provider-symlinked binaries.
    pub fn lib_bin_dir(&self) -> PathBuf {
        self.lib_dir().join("bin")
    }

    /// Project-local pip install prefix.
    pub fn lib_pip_dir(&self) -> PathBuf {
        self.lib_dir().join("pip")
    }

    /// Project-local npm install prefix.
    pub fn lib_npm_dir(&self) -> PathBuf {
        self.lib_dir().join("npm")
    }

    /// Where browser-fetch installers place versioned browser builds.
    pub fn lib_browsers_dir(&self) -> PathBuf {
        self.lib_dir().join("browsers")
    }

    /// The persisted config file (`Stash.conf`).
    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILENAME)
    }

    /// Dot-prefixed sibling holding the original bytes of a migrated
    /// legacy config file.
    pub fn config_backup_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_BACKUP_FILENAME)
    }

    /// Create every directory the layout names.
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [
            self.archive_dir(),
            self.sources_dir(),
            self.logs_dir(),
            self.cache_dir(),
            self.tmp_dir(),
            self.lib_bin_dir(),
            self.lib_pip_dir(),
            self.lib_npm_dir(),
            self.lib_browsers_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        Ok(())
    }
}
