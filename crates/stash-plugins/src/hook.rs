//! Plugin model: a plugin is a label plus an ordered list of hooks.
//!
//! Hooks are the only way a plugin contributes to the system: a config
//! set to resolve, a binary the plugin depends on, or a provider
//! mechanism other plugins' binaries may rank. The hook list is built
//! once at registry construction and never mutated.

use std::sync::Arc;

use stash_binaries::provider::BinProvider;
use stash_binaries::Binary;
use stash_config::{ConfigSchema, ConfigSnapshot};

/// One contribution a plugin makes to the running system.
pub enum Hook {
    /// A config set, resolved in registry declaration order.
    ConfigSet(ConfigSchema),
    /// An external tool this plugin depends on.
    Binary(Binary),
    /// An install/locate mechanism contributed for other plugins to use.
    Provider(Arc<dyn BinProvider>),
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigSet(schema) => f.debug_tuple("ConfigSet").field(&schema.name).finish(),
            Self::Binary(binary) => f.debug_tuple("Binary").field(&binary.name()).finish(),
            Self::Provider(provider) => f.debug_tuple("Provider").field(&provider.name()).finish(),
        }
    }
}

/// Sanity check run against the accumulated config after a plugin's
/// config sets resolve. May log warnings; must not mutate anything.
pub type ValidateFn = fn(&ConfigSnapshot<'_>);

/// A named, immutable bundle of hooks.
#[derive(Debug)]
pub struct Plugin {
    pub label: &'static str,
    pub verbose_name: &'static str,
    pub hooks: Vec<Hook>,
    pub validate: Option<ValidateFn>,
}

impl Plugin {
    pub fn new(label: &'static str, verbose_name: &'static str, hooks: Vec<Hook>) -> Self {
        Self {
            label,
            verbose_name,
            hooks,
            validate: None,
        }
    }

    pub fn with_validate(mut self, validate: ValidateFn) -> Self {
        self.validate = Some(validate);
        self
    }

    pub fn config_sets(&self) -> impl Iterator<Item = &ConfigSchema> {
        self.hooks.iter().filter_map(|hook| match hook {
            Hook::ConfigSet(schema) => Some(schema),
            _ => None,
        })
    }

    pub fn binaries(&self) -> impl Iterator<Item = &Binary> {
        self.hooks.iter().filter_map(|hook| match hook {
            Hook::Binary(binary) => Some(binary),
            _ => None,
        })
    }

    pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn BinProvider>> {
        self.hooks.iter().filter_map(|hook| match hook {
            Hook::Provider(provider) => Some(provider),
            _ => None,
        })
    }
}
