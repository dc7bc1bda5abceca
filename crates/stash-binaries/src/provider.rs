//! The BinProvider capability trait and shared probing helpers.
//!
//! A provider is one mechanism that can locate an installed binary
//! and/or install a missing one: a system package manager, a language
//! package manager (global or project-local flavor), the raw `$PATH`,
//! or a browser-fetch CLI. Probing and installs run blocking
//! subprocesses sequentially with no internal timeout; callers needing
//! a bound wrap the resolution call externally.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tokio::process::Command;

use crate::error::{Error, Result};

/// One mechanism for locating and/or installing named binaries.
#[async_trait]
pub trait BinProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Name of the helper tool that performs installs for this provider
    /// (a package manager or fetch CLI). Empty for locate-only providers.
    fn installer_bin(&self) -> String;

    /// Directories consulted when locating an already-installed binary.
    fn search_path(&self) -> Vec<PathBuf>;

    /// Package names handed to the installer for a logical binary name.
    fn packages_for(&self, bin_name: &str) -> Vec<String> {
        vec![bin_name.to_string()]
    }

    /// Is this binary already present under the provider's search path?
    async fn locate(&self, bin_name: &str) -> Result<Option<PathBuf>> {
        Ok(find_in_dirs(bin_name, &self.search_path()))
    }

    /// Whether this provider's installer tool is itself resolvable.
    fn installer_available(&self) -> bool {
        let installer = self.installer_bin();
        !installer.is_empty() && find_on_path(&installer).is_some()
    }

    /// Install the binary. `Ok(Some(path))` when the installer
    /// self-reports the installed path; `Ok(None)` means the caller
    /// should re-locate. A non-zero installer exit is an
    /// [`Error::InstallFailed`], never silently swallowed.
    async fn install(&self, bin_name: &str, packages: &[String]) -> Result<Option<PathBuf>>;
}

/// Directories of the process `$PATH`, in order.
pub fn path_dirs() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Locate an executable by name on the process `$PATH`.
pub fn find_on_path(name: &str) -> Option<PathBuf> {
    find_in_dirs(name, &path_dirs())
}

/// Locate an executable by name in an ordered list of directories.
pub fn find_in_dirs(name: &str, dirs: &[PathBuf]) -> Option<PathBuf> {
    for dir in dirs {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run an installer subprocess and capture its output.
///
/// Invoked as `<installer> <install_args...> <packages...>`. Blocks
/// until the installer exits; a hung installer blocks resolution.
pub async fn run_installer(
    provider: &str,
    installer: &Path,
    install_args: &[String],
    packages: &[String],
) -> Result<std::process::Output> {
    tracing::debug!(provider, ?installer, ?packages, "Running installer");

    let output = Command::new(installer)
        .args(install_args)
        .args(packages)
        .output()
        .await
        .map_err(|e| Error::Spawn {
            command: installer.display().to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(provider, %stdout, %stderr, "Installer failed");
        return Err(Error::InstallFailed {
            provider: provider.to_string(),
            packages: packages.to_vec(),
            code: output.status.code(),
            stdout,
            stderr,
        });
    }

    Ok(output)
}

/// Parse an installer's self-reported result from the last non-empty
/// stdout line: `<name>@<version> <absolute path>`.
pub fn parse_reported_install(stdout: &str) -> Option<(String, PathBuf)> {
    let line = stdout.lines().rev().find(|l| !l.trim().is_empty())?.trim();
    let (tag, path) = line.split_once(' ')?;
    let (_name, version) = tag.split_once('@')?;
    let path = PathBuf::from(path.trim());
    if !path.is_absolute() {
        return None;
    }
    Some((version.to_string(), path))
}

/// Run a version command and extract the first dotted version number
/// from its combined output.
pub async fn detect_version(cmd: &[String]) -> Option<String> {
    let (program, args) = cmd.split_first()?;
    let output = Command::new(program).args(args).output().await.ok()?;
    let combined = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    extract_version(&combined)
}

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)*)").unwrap());

/// First `N.N[.N...]` occurrence in free-form tool output.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_RE.find(output).map(|m| m.as_str().to_string())
}
