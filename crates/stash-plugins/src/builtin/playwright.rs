//! Playwright plugin: contributes the playwright browser-fetch
//! provider plus a descriptor for its own pip-installed CLI.

use stash_binaries::Binary;

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "playwright",
        "Playwright Browser Fetcher",
        vec![
            Hook::Provider(providers.playwright.clone()),
            Hook::Binary(Binary::new(
                "playwright",
                vec![
                    providers.lib_pip.clone(),
                    providers.sys_pip.clone(),
                    providers.env.clone(),
                ],
            )),
        ],
    )
}
