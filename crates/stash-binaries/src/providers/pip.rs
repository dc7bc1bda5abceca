//! Python package manager providers, in three flavors: the system pip,
//! a virtualenv's pip, and a project-local install prefix under the
//! data dir's `lib/pip`.

use std::path::PathBuf;

use async_trait::async_trait;
use stash_fs::DataLayout;

use crate::error::{Error, Result};
use crate::provider::{BinProvider, find_on_path, path_dirs, run_installer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipFlavor {
    /// Global/system site-packages.
    System,
    /// The data dir's `.venv` virtualenv.
    Venv,
    /// Project-local prefix under `lib/pip`.
    Lib,
}

pub struct PipProvider {
    flavor: PipFlavor,
    venv_dir: Option<PathBuf>,
    lib_dir: Option<PathBuf>,
}

impl PipProvider {
    pub fn system() -> Self {
        Self {
            flavor: PipFlavor::System,
            venv_dir: None,
            lib_dir: None,
        }
    }

    pub fn venv(layout: &DataLayout) -> Self {
        Self {
            flavor: PipFlavor::Venv,
            venv_dir: Some(layout.data_dir().join(".venv")),
            lib_dir: None,
        }
    }

    pub fn lib(layout: &DataLayout) -> Self {
        Self {
            flavor: PipFlavor::Lib,
            venv_dir: None,
            lib_dir: Some(layout.lib_pip_dir()),
        }
    }

    pub fn flavor(&self) -> PipFlavor {
        self.flavor
    }

    fn install_args(&self) -> Vec<String> {
        match (&self.flavor, &self.lib_dir) {
            (PipFlavor::Lib, Some(lib)) => vec![
                "install".to_string(),
                "--prefix".to_string(),
                lib.to_string_lossy().into_owned(),
            ],
            _ => vec!["install".to_string(), "--upgrade".to_string()],
        }
    }
}

#[async_trait]
impl BinProvider for PipProvider {
    fn name(&self) -> &'static str {
        match self.flavor {
            PipFlavor::System => "sys_pip",
            PipFlavor::Venv => "venv_pip",
            PipFlavor::Lib => "lib_pip",
        }
    }

    fn installer_bin(&self) -> String {
        "pip".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        match self.flavor {
            PipFlavor::System => path_dirs(),
            PipFlavor::Venv => self
                .venv_dir
                .iter()
                .map(|venv| venv.join("bin"))
                .collect(),
            PipFlavor::Lib => self.lib_dir.iter().map(|lib| lib.join("bin")).collect(),
        }
    }

    fn installer_available(&self) -> bool {
        match self.flavor {
            // the venv flavor installs with the venv's own pip
            PipFlavor::Venv => self
                .venv_dir
                .as_ref()
                .is_some_and(|venv| venv.join("bin/pip").is_file()),
            _ => find_on_path("pip").is_some(),
        }
    }

    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        let installer = match self.flavor {
            PipFlavor::Venv => self
                .venv_dir
                .as_ref()
                .map(|venv| venv.join("bin/pip"))
                .filter(|pip| pip.is_file()),
            _ => find_on_path("pip"),
        }
        .ok_or_else(|| Error::InstallNotSupported {
            provider: self.name().to_string(),
        })?;

        run_installer(self.name(), &installer, &self.install_args(), packages).await?;
        tracing::info!(bin_name, ?packages, flavor = ?self.flavor, "Installed via pip");
        Ok(None)
    }
}
