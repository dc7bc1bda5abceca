//! Raw-PATH provider: locate-only.

use std::path::PathBuf;

use async_trait::async_trait;
use stash_fs::DataLayout;

use crate::error::{Error, Result};
use crate::provider::{BinProvider, path_dirs};

/// Finds binaries already on the process `$PATH`, preceded by the data
/// dir's `lib/bin` so manually placed binaries win. Cannot install.
pub struct EnvProvider {
    extra_dirs: Vec<PathBuf>,
}

impl EnvProvider {
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            extra_dirs: vec![layout.lib_bin_dir()],
        }
    }

    /// `$PATH` only, no data-dir prefix. Useful outside a data dir.
    pub fn bare() -> Self {
        Self {
            extra_dirs: Vec::new(),
        }
    }
}

#[async_trait]
impl BinProvider for EnvProvider {
    fn name(&self) -> &'static str {
        "env"
    }

    fn installer_bin(&self) -> String {
        String::new()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        let mut dirs = self.extra_dirs.clone();
        dirs.extend(path_dirs());
        dirs
    }

    async fn install(&self, _bin_name: &str, _packages: &[String]) -> Result<Option<PathBuf>> {
        Err(Error::InstallNotSupported {
            provider: self.name().to_string(),
        })
    }
}
