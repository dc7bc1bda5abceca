//! Yt-dlp media extractor plugin: config set, the yt-dlp binary, and
//! the ffmpeg binary yt-dlp needs for muxing.

use stash_binaries::{Binary, ProviderOverride};
use stash_config::{
    ConfigField, ConfigSchema, ConfigSection, ConfigSnapshot, ConfigType, ConfigValue,
};

use crate::builtin::ProviderSet;
use crate::hook::{Hook, Plugin};

/// Media downloads shorter than this are almost always truncated.
const MIN_SANE_MEDIA_TIMEOUT: i64 = 20;

pub(crate) fn plugin(providers: &ProviderSet) -> Plugin {
    Plugin::new(
        "ytdlp",
        "Yt-dlp Media Extractor",
        vec![
            Hook::ConfigSet(schema()),
            Hook::Binary(Binary::new(
                "yt-dlp",
                vec![
                    providers.lib_pip.clone(),
                    providers.sys_pip.clone(),
                    providers.apt.clone(),
                    providers.brew.clone(),
                    providers.env.clone(),
                ],
            )),
            Hook::Binary(ffmpeg(providers)),
        ],
    )
    .with_validate(warn_on_low_timeout)
}

fn schema() -> ConfigSchema {
    ConfigSchema::new(
        "YtdlpConfig",
        ConfigSection::Dependency,
        vec![
            ConfigField::constant("USE_YTDLP", ConfigValue::Bool(true))
                .with_aliases(&["USE_YOUTUBEDL", "SAVE_MEDIA"]),
            ConfigField::constant("YTDLP_BINARY", ConfigValue::Str("yt-dlp".into()))
                .with_aliases(&["YOUTUBEDL_BINARY"]),
            ConfigField::constant("YTDLP_EXTRA_ARGS", ConfigValue::List(Vec::new())),
            ConfigField::computed(
                "YTDLP_CHECK_SSL_VALIDITY",
                ConfigType::Bool,
                &["CHECK_SSL_VALIDITY"],
                |c| Ok(ConfigValue::Bool(c.bool("CHECK_SSL_VALIDITY")?)),
            ),
            ConfigField::computed("YTDLP_TIMEOUT", ConfigType::Int, &["MEDIA_TIMEOUT"], |c| {
                Ok(ConfigValue::Int(c.int("MEDIA_TIMEOUT")?))
            }),
        ],
    )
}

/// ffmpeg reports no usable `--version` through apt/brew installs until
/// probed differently, so those providers carry version-command
/// overrides.
fn ffmpeg(providers: &ProviderSet) -> Binary {
    Binary::new(
        "ffmpeg",
        vec![
            providers.apt.clone(),
            providers.brew.clone(),
            providers.env.clone(),
        ],
    )
    .with_override(
        "apt",
        ProviderOverride {
            packages: None,
            version_cmd: Some(vec!["apt".into(), "show".into(), "ffmpeg".into()]),
        },
    )
    .with_override(
        "brew",
        ProviderOverride {
            packages: None,
            version_cmd: Some(vec![
                "brew".into(),
                "info".into(),
                "ffmpeg".into(),
                "--quiet".into(),
            ]),
        },
    )
}

fn warn_on_low_timeout(config: &ConfigSnapshot<'_>) {
    let enabled = config.bool("USE_YTDLP").unwrap_or(false);
    let timeout = config.int("YTDLP_TIMEOUT").unwrap_or(i64::MAX);
    if enabled && timeout < MIN_SANE_MEDIA_TIMEOUT {
        tracing::warn!(
            timeout,
            "YTDLP_TIMEOUT is low; media downloads are likely to be cut off. \
             Raise MEDIA_TIMEOUT or disable USE_YTDLP."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stash_config::{ConfigResolver, ConfigSources, FlatConfig};

    #[test]
    fn ytdlp_defaults_chain_off_core_values() {
        let schema = schema();
        let mut context = FlatConfig::new();
        context.insert("CHECK_SSL_VALIDITY".into(), ConfigValue::Bool(false));
        context.insert("MEDIA_TIMEOUT".into(), ConfigValue::Int(3600));

        let resolved = ConfigResolver::with_context(&schema, context)
            .resolve(&ConfigSources::empty())
            .unwrap();

        assert_eq!(resolved.bool("YTDLP_CHECK_SSL_VALIDITY").unwrap(), false);
        assert_eq!(resolved.int("YTDLP_TIMEOUT").unwrap(), 3600);
        assert_eq!(resolved.str("YTDLP_BINARY").unwrap(), "yt-dlp");
    }

    #[test]
    fn youtubedl_binary_alias_still_works() {
        let schema = schema();
        let mut context = FlatConfig::new();
        context.insert("CHECK_SSL_VALIDITY".into(), ConfigValue::Bool(true));
        context.insert("MEDIA_TIMEOUT".into(), ConfigValue::Int(60));

        let mut sources = ConfigSources::empty();
        sources.set_env("YOUTUBEDL_BINARY", "/opt/bin/yt-dlp");

        let resolved = ConfigResolver::with_context(&schema, context)
            .resolve(&sources)
            .unwrap();
        assert_eq!(resolved.str("YTDLP_BINARY").unwrap(), "/opt/bin/yt-dlp");
    }
}
