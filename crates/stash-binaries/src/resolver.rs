//! Resolution engine: probe a binary's providers in order, install on
//! demand, and cache the winner for the life of the process.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::binary::{Binary, BinaryInfo};
use crate::error::{Error, Result};
use crate::provider::detect_version;

/// Resolves [`Binary`] descriptors to concrete on-disk paths.
///
/// Resolution for a given name runs at most once per resolver: the
/// first successful outcome is cached and every later call returns it
/// without re-probing. Failed resolutions are NOT cached, so a retry
/// after the user installs something by hand gets a fresh probe. The
/// cache lock is held across the whole resolution, which also
/// serializes concurrent resolves of different binaries; installs are
/// slow and rare enough that the simplicity wins.
#[derive(Debug, Default)]
pub struct BinaryResolver {
    cache: Mutex<HashMap<String, BinaryInfo>>,
}

impl BinaryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `binary` to an installed path, installing if necessary.
    ///
    /// Two passes over the providers in declaration order: first every
    /// provider gets to locate an existing install (no side effects);
    /// only if all of them miss does the first provider with a working
    /// installer get to install. An installer that runs and fails
    /// aborts resolution with its error rather than falling through to
    /// the next provider, so a broken `pip install` is surfaced instead
    /// of being papered over by a stale apt package.
    pub async fn resolve(&self, binary: &Binary) -> Result<BinaryInfo> {
        let mut cache = self.cache.lock().await;
        if let Some(info) = cache.get(binary.name()) {
            tracing::debug!(name = binary.name(), ?info.abspath, "Binary cache hit");
            return Ok(info.clone());
        }

        let info = self.resolve_uncached(binary).await?;
        tracing::info!(
            name = %info.name,
            provider = info.provider,
            abspath = ?info.abspath,
            version = info.version.as_deref().unwrap_or("unknown"),
            "Resolved binary"
        );
        cache.insert(binary.name().to_string(), info.clone());
        Ok(info)
    }

    /// Cached result for `name`, if a resolve already succeeded.
    pub async fn cached(&self, name: &str) -> Option<BinaryInfo> {
        self.cache.lock().await.get(name).cloned()
    }

    async fn resolve_uncached(&self, binary: &Binary) -> Result<BinaryInfo> {
        let name = binary.name();

        // Pass 1: something already on disk?
        for provider in binary.providers() {
            match provider.locate(name).await {
                Ok(Some(abspath)) => {
                    let version = detect_version(&binary.version_cmd(provider.as_ref(), &abspath)).await;
                    return Ok(BinaryInfo {
                        name: name.to_string(),
                        abspath,
                        version,
                        provider: provider.name(),
                    });
                }
                Ok(None) => {}
                // A fixed-binary provider asked for the wrong name is a
                // miswired descriptor; fail fast instead of letting a
                // later provider paper over it.
                Err(err @ Error::UnsupportedBinary { .. }) => return Err(err),
                Err(err) => {
                    tracing::debug!(name, provider = provider.name(), %err, "Locate probe failed");
                }
            }
        }

        // Pass 2: install via the first provider whose installer works.
        for provider in binary.providers() {
            if !provider.installer_available() {
                tracing::debug!(
                    name,
                    provider = provider.name(),
                    "Skipping install, installer unavailable"
                );
                continue;
            }

            let packages = binary.packages_for(provider.as_ref());
            tracing::info!(name, provider = provider.name(), ?packages, "Installing binary");

            let abspath = match provider.install(name, &packages).await? {
                Some(reported) => reported,
                // Installer exited cleanly but did not report a path;
                // trust the provider's own search path over $PATH.
                None => provider.locate(name).await?.ok_or_else(|| {
                    Error::InstallProducedNothing {
                        provider: provider.name().to_string(),
                        name: name.to_string(),
                    }
                })?,
            };

            let version = detect_version(&binary.version_cmd(provider.as_ref(), &abspath)).await;
            return Ok(BinaryInfo {
                name: name.to_string(),
                abspath,
                version,
                provider: provider.name(),
            });
        }

        Err(Error::BinaryNotFound {
            name: name.to_string(),
            providers: binary
                .providers()
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::BinProvider;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scriptable provider that counts how often it is probed.
    struct FakeProvider {
        located: Option<PathBuf>,
        installs_to: Option<PathBuf>,
        install_fails: bool,
        locate_calls: AtomicUsize,
        install_calls: AtomicUsize,
    }

    impl FakeProvider {
        fn missing() -> Self {
            Self {
                located: None,
                installs_to: None,
                install_fails: false,
                locate_calls: AtomicUsize::new(0),
                install_calls: AtomicUsize::new(0),
            }
        }

        fn locating(path: &str) -> Self {
            Self {
                located: Some(PathBuf::from(path)),
                ..Self::missing()
            }
        }

        fn installing(path: &str) -> Self {
            Self {
                installs_to: Some(PathBuf::from(path)),
                ..Self::missing()
            }
        }

        fn failing_install() -> Self {
            Self {
                install_fails: true,
                ..Self::missing()
            }
        }
    }

    #[async_trait]
    impl BinProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn installer_bin(&self) -> String {
            "fake-installer".to_string()
        }

        fn search_path(&self) -> Vec<PathBuf> {
            Vec::new()
        }

        fn installer_available(&self) -> bool {
            self.installs_to.is_some() || self.install_fails
        }

        async fn locate(&self, _bin_name: &str) -> crate::Result<Option<PathBuf>> {
            self.locate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.located.clone())
        }

        async fn install(
            &self,
            _bin_name: &str,
            packages: &[String],
        ) -> crate::Result<Option<PathBuf>> {
            self.install_calls.fetch_add(1, Ordering::SeqCst);
            if self.install_fails {
                return Err(Error::InstallFailed {
                    provider: "fake".to_string(),
                    packages: packages.to_vec(),
                    code: Some(1),
                    stdout: String::new(),
                    stderr: "boom".to_string(),
                });
            }
            Ok(self.installs_to.clone())
        }
    }

    #[tokio::test]
    async fn located_binary_is_cached_and_probed_once() {
        let provider = Arc::new(FakeProvider::locating("/usr/bin/tool"));
        let binary = Binary::new("tool", vec![provider.clone()]);
        let resolver = BinaryResolver::new();

        let first = resolver.resolve(&binary).await.unwrap();
        let second = resolver.resolve(&binary).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.abspath, PathBuf::from("/usr/bin/tool"));
        assert_eq!(first.provider, "fake");
        assert_eq!(provider.locate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached("tool").await, Some(first));
    }

    #[tokio::test]
    async fn install_runs_only_after_every_locate_misses() {
        let miss = Arc::new(FakeProvider::missing());
        let installer = Arc::new(FakeProvider::installing("/opt/bin/tool"));
        let binary = Binary::new("tool", vec![miss.clone(), installer.clone()]);
        let resolver = BinaryResolver::new();

        let info = resolver.resolve(&binary).await.unwrap();

        assert_eq!(info.abspath, PathBuf::from("/opt/bin/tool"));
        assert_eq!(miss.locate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(installer.locate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(installer.install_calls.load(Ordering::SeqCst), 1);
        assert_eq!(miss.install_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_install_aborts_and_is_not_cached() {
        let broken = Arc::new(FakeProvider::failing_install());
        let fallback = Arc::new(FakeProvider::installing("/opt/bin/tool"));
        let binary = Binary::new("tool", vec![broken.clone(), fallback.clone()]);
        let resolver = BinaryResolver::new();

        let err = resolver.resolve(&binary).await.unwrap_err();
        assert!(matches!(err, Error::InstallFailed { .. }));
        // no silent fallback past a failing installer
        assert_eq!(fallback.install_calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolver.cached("tool").await, None);

        // a retry probes again instead of replaying a cached failure
        resolver.resolve(&binary).await.unwrap_err();
        assert_eq!(broken.install_calls.load(Ordering::SeqCst), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn wrong_name_for_a_fixed_binary_provider_fails_fast() {
        use crate::providers::{EnvProvider, PuppeteerProvider};
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        let temp = TempDir::new().unwrap();
        let layout = stash_fs::DataLayout::new(temp.path());
        layout.ensure_dirs().unwrap();

        // a perfectly locatable firefox must NOT rescue the miswired
        // descriptor; the contract violation wins
        let planted = layout.lib_bin_dir().join("firefox");
        std::fs::write(&planted, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&planted, std::fs::Permissions::from_mode(0o755)).unwrap();

        let binary = Binary::new(
            "firefox",
            vec![
                Arc::new(PuppeteerProvider::new(&layout)) as Arc<dyn BinProvider>,
                Arc::new(EnvProvider::new(&layout)) as Arc<dyn BinProvider>,
            ],
        );
        let resolver = BinaryResolver::new();

        let err = resolver.resolve(&binary).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedBinary { .. }));
        assert_eq!(resolver.cached("firefox").await, None);
    }

    #[tokio::test]
    async fn unresolvable_binary_reports_all_providers() {
        let miss = Arc::new(FakeProvider::missing());
        let binary = Binary::new("ghost", vec![miss.clone()]);
        let resolver = BinaryResolver::new();

        let err = resolver.resolve(&binary).await.unwrap_err();
        match err {
            Error::BinaryNotFound { name, providers } => {
                assert_eq!(name, "ghost");
                assert_eq!(providers, "fake");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(resolver.cached("ghost").await, None);
    }

    #[tokio::test]
    async fn clean_install_with_no_path_and_no_relocate_is_an_error() {
        struct Vanishing;

        #[async_trait]
        impl BinProvider for Vanishing {
            fn name(&self) -> &'static str {
                "vanishing"
            }
            fn installer_bin(&self) -> String {
                "x".to_string()
            }
            fn search_path(&self) -> Vec<PathBuf> {
                Vec::new()
            }
            fn installer_available(&self) -> bool {
                true
            }
            async fn install(
                &self,
                _bin_name: &str,
                _packages: &[String],
            ) -> crate::Result<Option<PathBuf>> {
                Ok(None)
            }
        }

        let binary = Binary::new("tool", vec![Arc::new(Vanishing) as Arc<dyn BinProvider>]);
        let resolver = BinaryResolver::new();
        let err = resolver.resolve(&binary).await.unwrap_err();
        assert!(matches!(err, Error::InstallProducedNothing { .. }));
    }
}
