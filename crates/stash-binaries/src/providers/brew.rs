//! Homebrew system package manager provider.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::provider::{BinProvider, find_on_path, path_dirs, run_installer};

pub struct BrewProvider;

impl BrewProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrewProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BinProvider for BrewProvider {
    fn name(&self) -> &'static str {
        "brew"
    }

    fn installer_bin(&self) -> String {
        "brew".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        // Homebrew prefixes first; brew-installed kegs may not be on PATH yet
        let mut dirs = vec![
            PathBuf::from("/opt/homebrew/bin"),
            PathBuf::from("/usr/local/bin"),
        ];
        dirs.extend(path_dirs());
        dirs
    }

    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        let installer =
            find_on_path(&self.installer_bin()).ok_or_else(|| Error::InstallNotSupported {
                provider: self.name().to_string(),
            })?;
        run_installer(
            self.name(),
            &installer,
            &["install".to_string()],
            packages,
        )
        .await?;
        tracing::info!(bin_name, ?packages, "Installed via brew");
        Ok(None)
    }
}
