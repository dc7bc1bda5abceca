//! Node package manager providers: global/system install and
//! project-local install under the data dir's `lib/npm`.

use std::path::PathBuf;

use async_trait::async_trait;
use stash_fs::DataLayout;

use crate::error::{Error, Result};
use crate::provider::{BinProvider, find_on_path, path_dirs, run_installer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpmFlavor {
    /// `npm install -g`.
    System,
    /// `npm install --prefix <lib/npm>`, binaries under
    /// `lib/npm/node_modules/.bin`.
    Lib,
}

pub struct NpmProvider {
    flavor: NpmFlavor,
    lib_dir: Option<PathBuf>,
}

impl NpmProvider {
    pub fn system() -> Self {
        Self {
            flavor: NpmFlavor::System,
            lib_dir: None,
        }
    }

    pub fn lib(layout: &DataLayout) -> Self {
        Self {
            flavor: NpmFlavor::Lib,
            lib_dir: Some(layout.lib_npm_dir()),
        }
    }

    pub fn flavor(&self) -> NpmFlavor {
        self.flavor
    }

    fn install_args(&self) -> Vec<String> {
        match (&self.flavor, &self.lib_dir) {
            (NpmFlavor::Lib, Some(lib)) => vec![
                "install".to_string(),
                "--prefix".to_string(),
                lib.to_string_lossy().into_owned(),
            ],
            _ => vec!["install".to_string(), "-g".to_string()],
        }
    }
}

#[async_trait]
impl BinProvider for NpmProvider {
    fn name(&self) -> &'static str {
        match self.flavor {
            NpmFlavor::System => "sys_npm",
            NpmFlavor::Lib => "lib_npm",
        }
    }

    fn installer_bin(&self) -> String {
        "npm".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        match self.flavor {
            NpmFlavor::System => path_dirs(),
            NpmFlavor::Lib => self
                .lib_dir
                .iter()
                .map(|lib| lib.join("node_modules/.bin"))
                .collect(),
        }
    }

    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        let installer =
            find_on_path(&self.installer_bin()).ok_or_else(|| Error::InstallNotSupported {
                provider: self.name().to_string(),
            })?;
        run_installer(self.name(), &installer, &self.install_args(), packages).await?;
        tracing::info!(bin_name, ?packages, flavor = ?self.flavor, "Installed via npm");
        Ok(None)
    }
}
