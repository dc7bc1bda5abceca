//! Browser-fetch provider backed by the `playwright` CLI.
//!
//! Playwright keeps its downloads in a user-level cache
//! (`~/.cache/ms-playwright` on Linux) rather than inside the data
//! dir, so locating means scanning that shared cache. Like the
//! puppeteer provider this one only knows how to produce "chrome",
//! served by playwright's chromium builds, with a system
//! `google-chrome-stable` accepted as a fallback.

use std::path::PathBuf;

use async_trait::async_trait;
use stash_fs::DataLayout;

use crate::error::{Error, Result};
use crate::pattern::glob_components;
use crate::provider::{BinProvider, find_in_dirs, find_on_path, run_installer};

const CHROME: &str = "chrome";

pub struct PlaywrightProvider {
    cache_dir: PathBuf,
    installer_dirs: Vec<PathBuf>,
}

impl PlaywrightProvider {
    pub fn new(layout: &DataLayout) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("ms-playwright");
        Self {
            cache_dir,
            // The CLI is a pip package, so a lib-pip install of the
            // `playwright` distribution lands it here.
            installer_dirs: vec![layout.lib_pip_dir().join("bin")],
        }
    }

    /// Point the scan at a custom browsers cache (tests).
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            installer_dirs: Vec::new(),
        }
    }

    /// Resolve the CLI in custom dirs instead of the data dir (tests).
    pub fn with_installer_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.installer_dirs = dirs;
        self
    }

    /// The `playwright` CLI, data-dir pip tree first, then `$PATH`.
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

    /// Chromium builds in the playwright cache, lexically sorted.
    ///
    /// Lexically-last is treated as newest, same heuristic as the
    /// puppeteer scan.
    fn installed_browser_bins(&self) -> Vec<PathBuf> {
        if std::env::consts::OS == "macos" {
            // chromium-1140/chrome-mac/Chromium.app/Contents/MacOS/Chromium
            return glob_components(
                &self.cache_dir,
                &[
                    "chromium-*",
                    "chrome-mac*",
                    "Chromium.app",
                    "Contents",
                    "MacOS",
                    "Chromium",
                ],
            );
        }
        // chromium-1140/chrome-linux/chrome
        glob_components(&self.cache_dir, &["chromium-*", "chrome-linux*", "chrome"])
    }
}

#[async_trait]
impl BinProvider for PlaywrightProvider {
    fn name(&self) -> &'static str {
        "playwright"
    }

    fn installer_bin(&self) -> String {
        "playwright".to_string()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        vec![self.cache_dir.clone()]
    }

    fn packages_for(&self, _bin_name: &str) -> Vec<String> {
        vec!["chromium".to_string()]
    }

    fn installer_available(&self) -> bool {
        self.find_installer().is_some()
    }

    async fn locate(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        self.ensure_chrome(bin_name)?;
        if let Some(found) = self.installed_browser_bins().into_iter().next_back() {
            return Ok(Some(found));
        }
        // A distro-installed chrome is just as usable.
        Ok(find_on_path("google-chrome-stable"))
    }

    /// `playwright install chromium`
    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>> {
        self.ensure_chrome(bin_name)?;
        let installer = self
            .find_installer()
            .ok_or_else(|| Error::InstallNotSupported {
                provider: self.name().to_string(),
            })?;

        run_installer(self.name(), &installer, &["install".to_string()], packages).await?;

        // The playwright CLI does not report the installed path, so a
        // fresh cache scan is the only way to find the new build.
        Ok(self.installed_browser_bins().into_iter().next_back())
    }
}
