//! Npm package-manager plugin: contributes the npm providers and the
//! node binary other plugins' install CLIs rely on.

use stash_binaries::Binary;

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "npm",
        "Npm Package Manager",
        vec![
            Hook::Provider(providers.lib_npm.clone()),
            Hook::Provider(providers.sys_npm.clone()),
            Hook::Binary(Binary::new("node", vec![providers.env.clone()])),
        ],
    )
}
