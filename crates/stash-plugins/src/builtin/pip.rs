//! Pip package-manager plugin: contributes the project-local and
//! system pip providers.

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "pip",
        "Pip Package Manager",
        vec![
            Hook::Provider(providers.lib_pip.clone()),
            Hook::Provider(providers.sys_pip.clone()),
        ],
    )
}
