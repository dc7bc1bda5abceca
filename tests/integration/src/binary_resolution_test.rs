//! End-to-end binary resolution: locating planted executables through
//! the data-dir layout, installing via a scripted fake installer, and
//! cache behavior across repeated resolves.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use stash_binaries::provider::{
    BinProvider, find_on_path, parse_reported_install, run_installer,
};
use stash_binaries::{Binary, BinaryResolver, Error};
use stash_binaries::providers::EnvProvider;
use stash_fs::DataLayout;
use tempfile::TempDir;

fn write_script(path: &Path, body: &str) {
    fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Provider that installs by running a shell script which reports the
/// installed path on its last stdout line, the way the browser-fetch
/// CLIs do.
struct ScriptedProvider {
    installer: PathBuf,
    /// Log file the installer script appends to on every run.
    run_log: PathBuf,
}

#[async_trait]
impl BinProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn installer_bin(&self) -> String {
        self.installer.to_string_lossy().into_owned()
    }

    fn search_path(&self) -> Vec<PathBuf> {
        Vec::new()
    }

    fn installer_available(&self) -> bool {
        self.installer.is_file()
    }

    async fn install(&self, _bin_name: &str, packages: &[String]) -> stash_binaries::Result<Option<PathBuf>> {
        let output = run_installer(self.name(), &self.installer, &[], packages).await?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_reported_install(&stdout).map(|(_version, path)| path))
    }
}

impl ScriptedProvider {
    fn runs(&self) -> usize {
        fs::read_to_string(&self.run_log)
            .map(|log| log.lines().count())
            .unwrap_or(0)
    }
}

#[tokio::test]
async fn planted_executable_resolves_through_the_data_dir() {
    let temp = TempDir::new().unwrap();
    let layout = DataLayout::new(temp.path());
    layout.ensure_dirs().unwrap();

    let tool = layout.lib_bin_dir().join("mytool");
    write_script(&tool, r#"echo "mytool 9.9.9""#);

    let env = Arc::new(EnvProvider::new(&layout)) as Arc<dyn BinProvider>;
    let binary = Binary::new("mytool", vec![env]);
    let resolver = BinaryResolver::new();

    let info = resolver.resolve(&binary).await.unwrap();
    assert_eq!(info.abspath, tool);
    assert_eq!(info.provider, "env");
    assert_eq!(info.version.as_deref(), Some("9.9.9"));

    // second resolve is a pure cache hit
    assert_eq!(resolver.cached("mytool").await, Some(info));
}

#[tokio::test]
async fn scripted_installer_reports_path_and_runs_once() {
    let temp = TempDir::new().unwrap();
    let installed = temp.path().join("installed").join("tool");
    fs::create_dir_all(installed.parent().unwrap()).unwrap();
    write_script(&installed, r#"echo "tool 2.0.1""#);

    let run_log = temp.path().join("installer.log");
    let installer = temp.path().join("fake-installer");
    write_script(
        &installer,
        &format!(
            "echo run >> {}\necho \"Fetching $*...\"\necho \"tool@2.0.1 {}\"",
            run_log.display(),
            installed.display()
        ),
    );

    let provider = Arc::new(ScriptedProvider {
        installer,
        run_log,
    });
    let binary = Binary::new("tool", vec![provider.clone() as Arc<dyn BinProvider>]);
    let resolver = BinaryResolver::new();

    let info = resolver.resolve(&binary).await.unwrap();
    assert_eq!(info.abspath, installed);
    assert_eq!(info.provider, "scripted");
    assert_eq!(info.version.as_deref(), Some("2.0.1"));
    assert_eq!(provider.runs(), 1);

    // cached result, installer not re-run
    resolver.resolve(&binary).await.unwrap();
    assert_eq!(provider.runs(), 1);
}

#[tokio::test]
async fn failing_installer_surfaces_its_output() {
    let temp = TempDir::new().unwrap();
    let installer = temp.path().join("broken-installer");
    write_script(&installer, "echo \"no such package\" >&2\nexit 4");

    let provider = Arc::new(ScriptedProvider {
        installer,
        run_log: temp.path().join("unused.log"),
    });
    let binary = Binary::new("tool", vec![provider as Arc<dyn BinProvider>]);
    let resolver = BinaryResolver::new();

    let err = resolver.resolve(&binary).await.unwrap_err();
    match err {
        Error::InstallFailed { code, stderr, .. } => {
            assert_eq!(code, Some(4));
            assert_eq!(stderr, "no such package");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(resolver.cached("tool").await, None);
}

#[tokio::test]
async fn nothing_resolvable_is_a_not_found_error() {
    let temp = TempDir::new().unwrap();
    let layout = DataLayout::new(temp.path());
    layout.ensure_dirs().unwrap();

    // locate-only provider restricted to the empty lib/bin dir
    let env = Arc::new(EnvProvider::new(&layout)) as Arc<dyn BinProvider>;
    // keep the probe off the real $PATH
    assert!(find_on_path("definitely-not-a-real-tool-xyz").is_none());

    let binary = Binary::new("definitely-not-a-real-tool-xyz", vec![env]);
    let resolver = BinaryResolver::new();

    let err = resolver.resolve(&binary).await.unwrap_err();
    assert!(matches!(err, Error::BinaryNotFound { .. }));
}
