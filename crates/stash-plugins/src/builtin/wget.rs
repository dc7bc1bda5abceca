//! Wget extractor plugin: toggles and options for wget/WARC capture
//! plus the wget binary.

use stash_binaries::Binary;
use stash_config::{ConfigField, ConfigSchema, ConfigSection, ConfigType, ConfigValue};

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "wget",
        "Wget Extractor",
        vec![
            Hook::ConfigSet(toggles()),
            Hook::ConfigSet(options()),
            Hook::Binary(Binary::new(
                "wget",
                vec![
                    providers.apt.clone(),
                    providers.brew.clone(),
                    providers.env.clone(),
                ],
            )),
        ],
    )
}

fn toggles() -> ConfigSchema {
    ConfigSchema::new(
        "WgetToggles",
        ConfigSection::ArchiveMethodToggles,
        vec![
            ConfigField::constant("SAVE_WGET", ConfigValue::Bool(true)),
            ConfigField::constant("SAVE_WARC", ConfigValue::Bool(true)),
        ],
    )
}

fn options() -> ConfigSchema {
    ConfigSchema::new(
        "WgetOptions",
        ConfigSection::ArchiveMethodOptions,
        vec![
            ConfigField::computed("WGET_TIMEOUT", ConfigType::Int, &["TIMEOUT"], |c| {
                Ok(ConfigValue::Int(c.int("TIMEOUT")?))
            }),
            ConfigField::computed(
                "WGET_CHECK_SSL_VALIDITY",
                ConfigType::Bool,
                &["CHECK_SSL_VALIDITY"],
                |c| Ok(ConfigValue::Bool(c.bool("CHECK_SSL_VALIDITY")?)),
            ),
            ConfigField::computed("WGET_USER_AGENT", ConfigType::Str, &["USER_AGENT"], |c| {
                Ok(ConfigValue::Str(c.str("USER_AGENT")?.to_string()))
            }),
        ],
    )
}
