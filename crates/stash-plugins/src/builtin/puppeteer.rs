//! Puppeteer plugin: contributes the puppeteer browser-fetch provider,
//! the chrome binary descriptor, and a descriptor for the npm-installed
//! puppeteer package itself. Puppeteer installs into the data dir and
//! so ranks ahead of playwright's user-level cache.

use stash_binaries::Binary;

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "puppeteer",
        "Puppeteer Browser Fetcher",
        vec![
            Hook::Provider(providers.puppeteer.clone()),
            Hook::Binary(Binary::new(
                "chrome",
                vec![providers.puppeteer.clone(), providers.playwright.clone()],
            )),
            Hook::Binary(Binary::new(
                "puppeteer",
                vec![
                    providers.lib_npm.clone(),
                    providers.sys_npm.clone(),
                    providers.env.clone(),
                ],
            )),
        ],
    )
}
