//! Core archiving config set. Other plugins' computed defaults read
//! these values, so this plugin precedes every extractor in the
//! registry order.

use stash_config::{ConfigField, ConfigSchema, ConfigSection, ConfigType, ConfigValue};

use crate::hook::{Hook, Plugin};

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Stash/0.1";

pub(crate) fn plugin() -> Plugin {
    Plugin::new("core", "Core Archiving", vec![Hook::ConfigSet(schema())])
}

fn schema() -> ConfigSchema {
    ConfigSchema::new(
        "ArchivingConfig",
        ConfigSection::Archiving,
        vec![
            ConfigField::constant("TIMEOUT", ConfigValue::Int(60)),
            // Media downloads inherit the general timeout unless set
            // explicitly; they usually need far more than page fetches.
            ConfigField::computed("MEDIA_TIMEOUT", ConfigType::Int, &["TIMEOUT"], |c| {
                Ok(ConfigValue::Int(c.int("TIMEOUT")?))
            }),
            ConfigField::constant("CHECK_SSL_VALIDITY", ConfigValue::Bool(true)),
            ConfigField::constant("USER_AGENT", ConfigValue::Str(DEFAULT_USER_AGENT.into())),
            ConfigField::constant("MEDIA_MAX_SIZE", ConfigValue::Str("750m".into())),
        ],
    )
}
