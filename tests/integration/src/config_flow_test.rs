//! End-to-end config flow: legacy-file migration, layered resolution
//! through the built-in plugin registry, and runtime overrides.

use std::collections::BTreeMap;
use std::fs;

use pretty_assertions::assert_eq;
use stash_config::sources::load_config_file;
use stash_config::{
    ConfigResolver, ConfigSources, ConfigValue, MigrationOutcome, ensure_structured,
};
use stash_fs::DataLayout;
use stash_plugins::Registry;
use tempfile::TempDir;

const LEGACY_CONF: &str = "\
[SERVER_CONFIG]
SECRET_KEY=abc123

[GENERAL]
SAVE_MEDIA=False
TIMEOUT=25

[ARCHIVING]
CHECK_SSL_VALIDITY=no
YTDLP_EXTRA_ARGS=['--write-subs', '--write-auto-subs']
";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Data dir seeded with a pre-TOML flat config file.
fn legacy_data_dir() -> (TempDir, DataLayout) {
    let temp = TempDir::new().unwrap();
    let layout = DataLayout::new(temp.path());
    layout.ensure_dirs().unwrap();
    fs::write(layout.config_file(), LEGACY_CONF).unwrap();
    (temp, layout)
}

fn file_sources(layout: &DataLayout) -> ConfigSources {
    let file = load_config_file(&layout.config_file()).unwrap();
    ConfigSources::new(file, BTreeMap::new())
}

#[test]
fn legacy_config_migrates_and_resolves() {
    init_tracing();
    let (_temp, layout) = legacy_data_dir();

    let outcome = ensure_structured(&layout.config_file()).unwrap();
    let backup = match outcome {
        MigrationOutcome::Migrated { backup } => backup,
        other => panic!("expected migration, got {other:?}"),
    };

    // original bytes preserved in the dot-prefixed backup
    assert_eq!(backup, layout.config_backup_file());
    assert_eq!(fs::read_to_string(&backup).unwrap(), LEGACY_CONF);

    // the rewritten file is real TOML, grouped by the original sections
    let migrated: toml::Table =
        toml::from_str(&fs::read_to_string(layout.config_file()).unwrap()).unwrap();
    assert_eq!(
        migrated["GENERAL"].as_table().unwrap()["SAVE_MEDIA"],
        toml::Value::Boolean(false)
    );

    // migrated values come back typed through the full registry
    let registry = Registry::builtin(&layout);
    let config = registry.resolve_config(&file_sources(&layout)).unwrap();

    assert_eq!(config.get("USE_YTDLP"), Some(&ConfigValue::Bool(false)));
    assert_eq!(config.get("TIMEOUT"), Some(&ConfigValue::Int(25)));
    assert_eq!(config.get("MEDIA_TIMEOUT"), Some(&ConfigValue::Int(25)));
    assert_eq!(config.get("YTDLP_TIMEOUT"), Some(&ConfigValue::Int(25)));
    assert_eq!(
        config.get("CHECK_SSL_VALIDITY"),
        Some(&ConfigValue::Bool(false))
    );
    assert_eq!(
        config.get("YTDLP_EXTRA_ARGS"),
        Some(&ConfigValue::List(vec![
            "--write-subs".to_string(),
            "--write-auto-subs".to_string()
        ]))
    );
}

#[test]
fn migration_is_idempotent() {
    init_tracing();
    let (_temp, layout) = legacy_data_dir();

    ensure_structured(&layout.config_file()).unwrap();
    let migrated_once = fs::read(layout.config_file()).unwrap();
    let backup_once = fs::read(layout.config_backup_file()).unwrap();

    let outcome = ensure_structured(&layout.config_file()).unwrap();
    assert!(matches!(outcome, MigrationOutcome::AlreadyStructured));

    assert_eq!(fs::read(layout.config_file()).unwrap(), migrated_once);
    assert_eq!(fs::read(layout.config_backup_file()).unwrap(), backup_once);
}

#[test]
fn missing_config_file_is_fine() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let layout = DataLayout::new(temp.path());

    let outcome = ensure_structured(&layout.config_file()).unwrap();
    assert!(matches!(outcome, MigrationOutcome::Absent));

    // defaults-only resolution still produces a full config
    let registry = Registry::builtin(&layout);
    let config = registry
        .resolve_config(&ConfigSources::empty())
        .unwrap();
    assert_eq!(config.get("TIMEOUT"), Some(&ConfigValue::Int(60)));
    assert_eq!(config.get("SAVE_WGET"), Some(&ConfigValue::Bool(true)));
}

#[test]
fn environment_beats_the_config_file() {
    init_tracing();
    let (_temp, layout) = legacy_data_dir();
    ensure_structured(&layout.config_file()).unwrap();

    let mut sources = file_sources(&layout);
    sources.set_env("TIMEOUT", "10");

    let registry = Registry::builtin(&layout);
    let config = registry.resolve_config(&sources).unwrap();

    // env wins over the file's 25, and the computed chain follows
    assert_eq!(config.get("TIMEOUT"), Some(&ConfigValue::Int(10)));
    assert_eq!(config.get("MEDIA_TIMEOUT"), Some(&ConfigValue::Int(10)));
    assert_eq!(config.get("WGET_TIMEOUT"), Some(&ConfigValue::Int(10)));
}

#[test]
fn runtime_override_re_resolves_computed_defaults() {
    init_tracing();
    let temp = TempDir::new().unwrap();
    let layout = DataLayout::new(temp.path());
    let registry = Registry::builtin(&layout);

    let core = registry
        .plugins()
        .iter()
        .find(|p| p.label == "core")
        .unwrap();
    let schema = core.config_sets().next().unwrap();

    let mut sources = ConfigSources::empty();
    let resolver = ConfigResolver::new(schema);
    let before = resolver.resolve(&sources).unwrap();
    assert_eq!(before.int("MEDIA_TIMEOUT").unwrap(), 60);

    let after = resolver
        .update_in_place(&mut sources, &[("TIMEOUT", "90".to_string())])
        .unwrap();
    assert_eq!(after.int("TIMEOUT").unwrap(), 90);
    assert_eq!(after.int("MEDIA_TIMEOUT").unwrap(), 90);
    // the override reached the process env for spawned subprocesses
    assert_eq!(std::env::var("TIMEOUT").unwrap(), "90");
}
