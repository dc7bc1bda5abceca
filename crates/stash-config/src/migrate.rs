//! In-place migration of legacy flat-INI config files to structured TOML.
//!
//! Detection is an explicit format sniff with three outcomes, not
//! parse-failure control flow: a file either already parses as strict
//! TOML, has the recognizable `[SECTION]` / `KEY=value` legacy shape, or
//! is surfaced to the operator as unrecognizable.
//!
//! Migration is lossy for comments only (documented behavior); every
//! value survives, falling back to a quoted string when coercion is
//! ambiguous. The original bytes are kept in a dot-prefixed backup file
//! next to the config file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::coerce::coerce;
use crate::error::{ConfigError, Result};

/// Comment line prepended to every converted file.
pub const CONVERSION_HEADER: &str = "# Converted from INI to TOML format: https://toml.io/en/\n\n";

/// On-disk format of a config file, as judged by [`sniff_format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// Valid structured TOML.
    Structured,
    /// Legacy flat-INI shape: section headers and bare `key=value` lines.
    Legacy,
    /// Neither; surfaced to the operator, never silently rewritten.
    Unrecognized,
}

/// What [`ensure_structured`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No file at the given path.
    Absent,
    /// File was already structured; nothing touched.
    AlreadyStructured,
    /// File was converted in place; original bytes live at `backup`.
    Migrated { backup: PathBuf },
}

/// Judge the on-disk format of config file content.
pub fn sniff_format(content: &str) -> ConfigFormat {
    if toml::from_str::<toml::Table>(content).is_ok() {
        return ConfigFormat::Structured;
    }
    if looks_like_ini(content) {
        ConfigFormat::Legacy
    } else {
        ConfigFormat::Unrecognized
    }
}

/// Every meaningful line must be a section header or a `key=value` pair,
/// and at least one section header must precede the first pair.
fn looks_like_ini(content: &str) -> bool {
    let mut sections = 0usize;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') && line.len() > 2 {
            sections += 1;
            continue;
        }
        if sections == 0 {
            return false;
        }
        match line.split_once('=') {
            Some((key, _)) if !key.trim().is_empty() => {}
            _ => return false,
        }
    }
    sections > 0
}

/// Convert legacy INI content into its structured TOML equivalent.
///
/// Sections and keys are upper-cased; values go through the coercion
/// ladder. Comments are dropped.
pub fn convert_ini(content: &str) -> Result<String> {
    let mut root = toml::Table::new();
    let mut current: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            let section = line[1..line.len() - 1].trim().to_uppercase();
            root.entry(section.clone())
                .or_insert_with(|| toml::Value::Table(toml::Table::new()));
            current = Some(section);
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let Some(section) = &current else {
            continue;
        };
        if let Some(toml::Value::Table(table)) = root.get_mut(section) {
            table.insert(key.trim().to_uppercase(), coerce(value.trim()));
        }
    }

    let body = toml::to_string(&root)?;
    Ok(format!("{CONVERSION_HEADER}{body}"))
}

/// Make sure the config file at `path` is in the structured format.
///
/// No-op when the file is absent or already structured. A legacy file is
/// backed up to a dot-prefixed `.<name>.bak` sibling, converted, and
/// atomically replaced. Running this twice leaves the file byte-identical
/// and creates no second backup.
pub fn ensure_structured(path: &Path) -> Result<MigrationOutcome> {
    if !path.is_file() {
        return Ok(MigrationOutcome::Absent);
    }
    let original = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;

    match sniff_format(&original) {
        ConfigFormat::Structured => Ok(MigrationOutcome::AlreadyStructured),
        ConfigFormat::Unrecognized => Err(ConfigError::FileFormat {
            path: path.to_path_buf(),
            message: "file is neither valid TOML nor legacy INI".to_string(),
        }),
        ConfigFormat::Legacy => {
            let backup = backup_path(path);
            stash_fs::write_atomic(&backup, original.as_bytes())?;

            let converted = convert_ini(&original)?;
            stash_fs::write_atomic_locked(path, converted.as_bytes())?;

            tracing::info!(?path, ?backup, "Migrated legacy INI config to TOML");
            Ok(MigrationOutcome::Migrated { backup })
        }
    }
}

fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.bak"))
}
