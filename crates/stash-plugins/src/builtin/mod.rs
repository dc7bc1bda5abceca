//! The built-in plugins, constructed in dependency order.

use std::sync::Arc;

use stash_binaries::provider::BinProvider;
use stash_binaries::providers::{
    AptProvider, BrewProvider, EnvProvider, NpmProvider, PipProvider, PlaywrightProvider,
    PuppeteerProvider,
};
use stash_fs::DataLayout;

use crate::hook::Plugin;

mod archiving;
mod npm;
mod pip;
mod playwright;
mod puppeteer;
mod wget;
mod ytdlp;

/// Provider instances shared across plugins, so a binary descriptor in
/// one plugin can rank a provider contributed by another.
pub(crate) struct ProviderSet {
    pub env: Arc<dyn BinProvider>,
    pub apt: Arc<dyn BinProvider>,
    pub brew: Arc<dyn BinProvider>,
    pub lib_pip: Arc<dyn BinProvider>,
    pub sys_pip: Arc<dyn BinProvider>,
    pub lib_npm: Arc<dyn BinProvider>,
    pub sys_npm: Arc<dyn BinProvider>,
    pub puppeteer: Arc<dyn BinProvider>,
    pub playwright: Arc<dyn BinProvider>,
}

impl ProviderSet {
    fn new(layout: &DataLayout) -> Self {
        Self {
            env: Arc::new(EnvProvider::new(layout)),
            apt: Arc::new(AptProvider::new()),
            brew: Arc::new(BrewProvider::new()),
            lib_pip: Arc::new(PipProvider::lib(layout)),
            sys_pip: Arc::new(PipProvider::system()),
            lib_npm: Arc::new(NpmProvider::lib(layout)),
            sys_npm: Arc::new(NpmProvider::system()),
            puppeteer: Arc::new(PuppeteerProvider::new(layout)),
            playwright: Arc::new(PlaywrightProvider::new(layout)),
        }
    }
}

/// Dependency-ordered built-in plugin list.
///
/// Package-manager plugins first (they only contribute providers), then
/// the core config set, then browser providers, then the extractors
/// whose computed defaults read core values.
pub(crate) fn plugins(layout: &DataLayout) -> Vec<Plugin> {
    let providers = ProviderSet::new(layout);
    vec![
        pip::plugin(&providers),
        npm::plugin(&providers),
        archiving::plugin(),
        playwright::plugin(&providers),
        puppeteer::plugin(&providers),
        ytdlp::plugin(&providers),
        wget::plugin(&providers),
    ]
}
