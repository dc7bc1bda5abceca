//! The statically enumerated plugin registry.

use std::sync::Arc;

use stash_binaries::provider::BinProvider;
use stash_binaries::Binary;
use stash_config::{ConfigResolver, ConfigSnapshot, ConfigSources, FlatConfig};
use stash_fs::DataLayout;

use crate::builtin;
use crate::error::Result;
use crate::hook::Plugin;

/// All installed plugins, in dependency order.
///
/// The order is fixed at construction: provider-contributing plugins
/// (pip, npm) come first, then the core config, then the plugins whose
/// config sets read core values. Config resolution walks this order, so
/// cross-set computed defaults are acyclic by construction.
#[derive(Debug)]
pub struct Registry {
    plugins: Vec<Plugin>,
}

impl Registry {
    /// The built-in plugin set, rooted at `layout`'s data dir.
    pub fn builtin(layout: &DataLayout) -> Self {
        Self {
            plugins: builtin::plugins(layout),
        }
    }

    /// Registry over an explicit plugin list (tests, trimmed-down tools).
    pub fn new(plugins: Vec<Plugin>) -> Self {
        Self { plugins }
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Resolve every plugin's config sets in declaration order.
    ///
    /// The flat result map accumulates across sets: a later set's
    /// computed defaults see the final values of every earlier set.
    /// After each plugin's sets resolve, its validate hook (if any) may
    /// inspect the accumulated values and log operator warnings.
    pub fn resolve_config(&self, sources: &ConfigSources) -> Result<FlatConfig> {
        let mut accumulated = FlatConfig::new();
        for plugin in &self.plugins {
            for schema in plugin.config_sets() {
                let resolved =
                    ConfigResolver::with_context(schema, accumulated.clone()).resolve(sources)?;
                tracing::debug!(
                    plugin = plugin.label,
                    set = schema.name,
                    fields = resolved.iter().count(),
                    "Resolved config set"
                );
                accumulated.extend(resolved.into_values());
            }
            if let Some(validate) = plugin.validate {
                validate(&ConfigSnapshot::new(&accumulated));
            }
        }
        Ok(accumulated)
    }

    /// The binary descriptor registered under `name`, if any.
    pub fn binary(&self, name: &str) -> Option<&Binary> {
        self.binaries().find(|b| b.name() == name)
    }

    pub fn binaries(&self) -> impl Iterator<Item = &Binary> {
        self.plugins.iter().flat_map(|p| p.binaries())
    }

    /// A contributed provider by its registered name (e.g. "lib_pip").
    pub fn provider(&self, name: &str) -> Option<Arc<dyn BinProvider>> {
        self.plugins
            .iter()
            .flat_map(|p| p.providers())
            .find(|p| p.name() == name)
            .cloned()
    }
}
