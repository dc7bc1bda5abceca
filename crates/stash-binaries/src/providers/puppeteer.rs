//! Browser-fetch provider backed by the `@puppeteer/browsers` CLI.
//!
//! Installs versioned chrome builds under the data dir's `lib/browsers`
//! tree via `npx @puppeteer/browsers install --path <dir> chrome@stable`
//! and finds existing builds by scanning that tree. Only the logical
//! name "chrome" is supported; asking for anything else is a caller
//! bug, surfaced as a hard error.

use std::path::PathBuf;

use async_trait::async_trait;
use stash_fs::DataLayout;

use crate::error::{Error, Result};
use crate::pattern::glob_components;
use crate::provider::{
    BinProvider, find_in_dirs, find_on_path, parse_reported_install, run_installer,
};

const CHROME: &str = "chrome";

pub struct PuppeteerProvider {
    browsers_dir: PathBuf,
    installer_dirs: Vec<PathBuf>,
}

impl PuppeteerProvider {
    pub fn new(layout: &DataLayout) -> Self {
        Self {
            browsers_dir: layout.lib_browsers_dir(),
            // npx shipped by a lib-npm node install lands here.
            installer_dirs: vec![layout.lib_npm_dir().join("node_modules/.bin")],
        }
    }

    /// Point the scan/install at a custom browsers dir (tests).
    pub fn with_browsers_dir(browsers_dir: impl Into<PathBuf>) -> Self {
        Self {
            browsers_dir: browsers_dir.into(),
            installer_dirs: Vec::new(),
        }
    }

    /// Resolve the CLI in custom dirs instead of the data dir (tests).
    pub fn with_installer_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.installer_dirs = dirs;
        self
    }

    /// The `npx` launcher, data-dir npm tree first, then `$PATH`.
    fn find_installer(&self) -> Option<PathBuf> {
        find_in_dirs(&self.installer_bin(), &self.installer_dirs)
            .or_else(|| find_on_path(&self.installer_bin()))
    }

    fn ensure_chrome(&self, bin_name: &str) -> Result<()> {
        if bin_name != CHROME {
            return Err(Error::UnsupportedBinary {
                provider: self.name().to_string(),
                supported: CHROME.to_string(),
                requested: bin_name.to_string(),
            });
        }
        Ok(())
    }

    fn install_args(&self) -> Vec<String> {
        vec![
            "@puppeteer/browsers".to_string(),
            "install".to_string(),
            "--path".to_string(),
            self.browsers_dir.to_string_lossy().into_owned(),
        ]
    }

    /// Installed chrome builds under the browsers dir, lexically sorted.
    ///
    /// On macOS the binary lives inside a `.app` bundle; on Linux it is
    /// a plain file. The lexically-last match is treated as the newest
    /// build, a deliberate heuristic kept for compatibility (it mis-
    /// orders e.g. major version 9 vs 10).
    fn installed_browser_bins(&self) -> Vec<PathBuf> {
        if std::env::consts::OS == "macos" {
            // chrome/mac_arm-129.0.6668.58/chrome-mac-arm64/Google Chrome for Testing.app/...
            return glob_components(
                &self.browsers_dir,
                &[
                    "chrome",
                    "mac*",
                    "chrome*",
                    "Google Chrome for Testing.app",
                    "Contents",
                    "MacOS",
                    "Google Chrome for Testing",
                ],
            );
        }
        // chrome/linux-131.0.6730.0/chrome-linux64/chrome
        glob_components(&self.browsers_dir, &["chrome", "linux*", "chrome*", "chrome"])
    }
}

#[async_trait]
impl BinProvider for PuppeteerProvider {
    fn name(&self) -> &'static str {
        "puppeteer"
    }

    fn installer_bin(&self) -> String {
        "npx".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        vec![self.browsers_dir.clone()]
    }

    fn packages_for(&self, _bin_name: &str) -> Vec<String> {
        vec!["chrome@stable".to_string()]
    }

    fn installer_available(&self) -> bool {
        self.find_installer().is_some()
    }

    async fn locate(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        self.ensure_chrome(bin_name)?;
        Ok(self.installed_browser_bins().into_iter().next_back())
    }

    /// `npx @puppeteer/browsers install --path <lib/browsers> chrome@stable`
    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        self.ensure_chrome(bin_name)?;
        let installer = self
            .find_installer()
            .ok_or_else(|| Error::InstallNotSupported {
                provider: self.name().to_string(),
            })?;

        std::fs::create_dir_all(&self.browsers_dir)
            .map_err(|e| stash_fs::Error::io(&self.browsers_dir, e))?;

        let output = run_installer(self.name(), &installer, &self.install_args(), packages).await?;

        // chrome@129.0.6668.58 /data/lib/browsers/chrome/linux-129.0.6668.58/chrome-linux64/chrome
        let stdout = String::from_utf8_lossy(&output.stdout);
        if let Some((version, path)) = parse_reported_install(&stdout) {
            tracing::info!(%version, ?path, "puppeteer installed chrome");
            return Ok(Some(path));
        }
        Ok(None)
    }
}
