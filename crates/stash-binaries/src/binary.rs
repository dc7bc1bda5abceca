//! Binary descriptors: a logical external dependency plus its ranked
//! providers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::provider::BinProvider;

/// Resolved metadata for one binary, as cached by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryInfo {
    pub name: String,
    pub abspath: PathBuf,
    pub version: Option<String>,
    /// Name of the provider that located or installed it.
    pub provider: &'static str,
}

/// Per-provider overrides for how one binary is looked up or installed.
#[derive(Debug, Clone, Default)]
pub struct ProviderOverride {
    /// Replace the provider's package names for this binary.
    pub packages: Option<Vec<String>>,
    /// Replace the default `<abspath> --version` probe, e.g. ffmpeg
    /// versions read via `apt show ffmpeg` / `brew info ffmpeg --quiet`.
    pub version_cmd: Option<Vec<String>>,
}

/// A logical external tool and the ordered providers allowed to supply it.
#[derive(Clone)]
pub struct Binary {
    name: String,
    providers: Vec<Arc<dyn BinProvider>>,
    overrides: HashMap<&'static str, ProviderOverride>,
}

impl Binary {
    pub fn new(name: impl Into<String>, providers: Vec<Arc<dyn BinProvider>>) -> Self {
        Self {
            name: name.into(),
            providers,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, provider: &'static str, overrides: ProviderOverride) -> Self {
        self.overrides.insert(provider, overrides);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn providers(&self) -> &[Arc<dyn BinProvider>] {
        &self.providers
    }

    /// Package names for an install through `provider`, honoring overrides.
    pub fn packages_for(&self, provider: &dyn BinProvider) -> Vec<String> {
        self.overrides
            .get(provider.name())
            .and_then(|o| o.packages.clone())
            .unwrap_or_else(|| provider.packages_for(&self.name))
    }

    /// Version-probe command for a resolved path, honoring overrides.
    pub fn version_cmd(&self, provider: &dyn BinProvider, abspath: &std::path::Path) -> Vec<String> {
        self.overrides
            .get(provider.name())
            .and_then(|o| o.version_cmd.clone())
            .unwrap_or_else(|| {
                vec![
                    abspath.to_string_lossy().into_owned(),
                    "--version".to_string(),
                ]
            })
    }
}

impl std::fmt::Debug for Binary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binary")
            .field("name", &self.name)
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
