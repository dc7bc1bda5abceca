//! Debian/Ubuntu system package manager provider.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::provider::{BinProvider, find_on_path, path_dirs, run_installer};

pub struct AptProvider;

impl AptProvider {
    pub fn new() -> Self {
        Self
    }

    fn install_args(&self) -> Vec<String> {
        vec!["install".to_string(), "-y".to_string()]
    }
}

impl Default for AptProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BinProvider for AptProvider {
    fn name(&self) -> &'static str {
        "apt"
    }

    fn installer_bin(&self) -> String {
        "apt-get".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        path_dirs()
    }

    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        let installer = find_on_path(&self.installer_bin()).ok_or_else(|| {
            crate::error::Error::InstallNotSupported {
                provider: self.name().to_string(),
            }
        })?;
        run_installer(self.name(), &installer, &self.install_args(), packages).await?;
        tracing::info!(bin_name, ?packages, "Installed via apt");
        // apt reports nothing machine-readable; caller re-locates on PATH
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apt_searches_the_process_path() {
        let provider = AptProvider::new();
        assert_eq!(provider.name(), "apt");
        assert_eq!(provider.installer_bin(), "apt-get");
        assert_eq!(provider.search_path(), path_dirs());
    }
}
