//! Config set declarations: sections, field types, and defaults.
//!
//! A schema declares the fields of one config set. Each field carries a
//! declared type, optional alternate names (accepted from the config
//! file and the environment), and a default that is either a constant or
//! a function of other already-resolved fields. Computed defaults name
//! the fields they read up front so the resolver can order evaluation
//! and detect cycles exactly.

use std::fmt;
use std::path::PathBuf;

use crate::error::Result;
use crate::resolver::ConfigSnapshot;

/// Logical grouping of config fields, matching the top-level tables of
/// the structured config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Shell,
    General,
    Storage,
    Server,
    Archiving,
    ArchiveMethodToggles,
    ArchiveMethodOptions,
    SearchBackend,
    Dependency,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 9] = [
        Self::Shell,
        Self::General,
        Self::Storage,
        Self::Server,
        Self::Archiving,
        Self::ArchiveMethodToggles,
        Self::ArchiveMethodOptions,
        Self::SearchBackend,
        Self::Dependency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shell => "SHELL_CONFIG",
            Self::General => "GENERAL_CONFIG",
            Self::Storage => "STORAGE_CONFIG",
            Self::Server => "SERVER_CONFIG",
            Self::Archiving => "ARCHIVING_CONFIG",
            Self::ArchiveMethodToggles => "ARCHIVE_METHOD_TOGGLES",
            Self::ArchiveMethodOptions => "ARCHIVE_METHOD_OPTIONS",
            Self::SearchBackend => "SEARCH_BACKEND_CONFIG",
            Self::Dependency => "DEPENDENCY_CONFIG",
        }
    }

    /// Match a top-level table name from the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == name)
    }
}

impl fmt::Display for ConfigSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared type of a config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigType {
    Bool,
    Int,
    Str,
    Path,
    List,
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Str => "str",
            Self::Path => "path",
            Self::List => "list",
        };
        write!(f, "{name}")
    }
}

/// A final typed config value.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Bool(bool),
    Int(i64),
    Str(String),
    Path(PathBuf),
    List(Vec<String>),
}

impl ConfigValue {
    pub fn type_of(&self) -> ConfigType {
        match self {
            Self::Bool(_) => ConfigType::Bool,
            Self::Int(_) => ConfigType::Int,
            Self::Str(_) => ConfigType::Str,
            Self::Path(_) => ConfigType::Path,
            Self::List(_) => ConfigType::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Path(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// Convert a TOML value from the config file into the declared type.
    ///
    /// Returns `None` when the TOML value does not fit the declared type;
    /// the resolver turns that into a `TypeMismatch` error.
    pub fn from_toml(ty: ConfigType, value: &toml::Value) -> Option<Self> {
        match (ty, value) {
            (ConfigType::Bool, toml::Value::Boolean(b)) => Some(Self::Bool(*b)),
            (ConfigType::Int, toml::Value::Integer(i)) => Some(Self::Int(*i)),
            (ConfigType::Str, toml::Value::String(s)) => Some(Self::Str(s.clone())),
            (ConfigType::Path, toml::Value::String(s)) => Some(Self::Path(PathBuf::from(s))),
            (ConfigType::List, toml::Value::Array(items)) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| match item {
                        toml::Value::String(s) => Some(s.clone()),
                        toml::Value::Integer(i) => Some(i.to_string()),
                        toml::Value::Boolean(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect();
                strings.map(Self::List)
            }
            _ => None,
        }
    }

    /// Parse an environment variable string into the declared type.
    pub fn parse_env(ty: ConfigType, raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        match ty {
            ConfigType::Bool => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(Self::Bool(true)),
                "false" | "no" | "0" | "" => Some(Self::Bool(false)),
                _ => None,
            },
            ConfigType::Int => trimmed.parse::<i64>().ok().map(Self::Int),
            ConfigType::Str => Some(Self::Str(trimmed.to_string())),
            ConfigType::Path => Some(Self::Path(PathBuf::from(trimmed))),
            ConfigType::List => {
                // JSON array form first, then comma-separated fallback
                if let Ok(serde_json::Value::Array(items)) =
                    serde_json::from_str::<serde_json::Value>(trimmed)
                {
                    let strings = items
                        .into_iter()
                        .map(|item| match item {
                            serde_json::Value::String(s) => s,
                            other => other.to_string(),
                        })
                        .collect();
                    return Some(Self::List(strings));
                }
                if trimmed.is_empty() {
                    return Some(Self::List(Vec::new()));
                }
                Some(Self::List(
                    trimmed
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect(),
                ))
            }
        }
    }

    pub fn to_toml(&self) -> toml::Value {
        match self {
            Self::Bool(b) => toml::Value::Boolean(*b),
            Self::Int(i) => toml::Value::Integer(*i),
            Self::Str(s) => toml::Value::String(s.clone()),
            Self::Path(p) => toml::Value::String(p.to_string_lossy().into_owned()),
            Self::List(items) => toml::Value::Array(
                items
                    .iter()
                    .map(|s| toml::Value::String(s.clone()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::Path(p) => write!(f, "{}", p.display()),
            Self::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

/// Signature of a computed-default function. Receives a read-only
/// snapshot of every field value resolved so far (this schema's layered
/// values plus the accumulated context of earlier config sets).
pub type ComputeFn = fn(&ConfigSnapshot<'_>) -> Result<ConfigValue>;

/// Default-value rule for a field.
pub enum ConfigDefault {
    /// A literal default value.
    Constant(ConfigValue),
    /// A deferred default evaluated after layering, once every field it
    /// names in `depends_on` has its final value.
    Computed {
        depends_on: &'static [&'static str],
        compute: ComputeFn,
    },
}

impl fmt::Debug for ConfigDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Computed { depends_on, .. } => f
                .debug_struct("Computed")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// One named setting inside a config set.
#[derive(Debug)]
pub struct ConfigField {
    pub name: &'static str,
    pub ty: ConfigType,
    pub default: Option<ConfigDefault>,
    pub aliases: &'static [&'static str],
}

impl ConfigField {
    /// Field with a constant default; the type is taken from the value.
    pub fn constant(name: &'static str, value: ConfigValue) -> Self {
        Self {
            name,
            ty: value.type_of(),
            default: Some(ConfigDefault::Constant(value)),
            aliases: &[],
        }
    }

    /// Field whose default is computed from other resolved fields.
    pub fn computed(
        name: &'static str,
        ty: ConfigType,
        depends_on: &'static [&'static str],
        compute: ComputeFn,
    ) -> Self {
        Self {
            name,
            ty,
            default: Some(ConfigDefault::Computed {
                depends_on,
                compute,
            }),
            aliases: &[],
        }
    }

    /// Field with no default: a value MUST come from the file or the
    /// environment, otherwise resolution fails at startup.
    pub fn required(name: &'static str, ty: ConfigType) -> Self {
        Self {
            name,
            ty,
            default: None,
            aliases: &[],
        }
    }

    pub fn with_aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Whether `key` addresses this field, by name or by alias.
    pub fn matches(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }
}

/// A named, typed group of configuration fields with per-layer opt-outs.
#[derive(Debug)]
pub struct ConfigSchema {
    pub name: &'static str,
    pub section: ConfigSection,
    pub fields: Vec<ConfigField>,
    pub load_from_defaults: bool,
    pub load_from_configfile: bool,
    pub load_from_environment: bool,
}

impl ConfigSchema {
    pub fn new(name: &'static str, section: ConfigSection, fields: Vec<ConfigField>) -> Self {
        Self {
            name,
            section,
            fields,
            load_from_defaults: true,
            load_from_configfile: true,
            load_from_environment: true,
        }
    }

    /// Disable the environment layer for this config set.
    pub fn without_environment(mut self) -> Self {
        self.load_from_environment = false;
        self
    }

    /// Disable the config-file layer for this config set.
    pub fn without_configfile(mut self) -> Self {
        self.load_from_configfile = false;
        self
    }

    /// Disable the schema-defaults layer for this config set.
    pub fn without_defaults(mut self) -> Self {
        self.load_from_defaults = false;
        self
    }

    pub fn field(&self, name: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("true", Some(true))]
    #[case("True", Some(true))]
    #[case("YES", Some(true))]
    #[case("1", Some(true))]
    #[case("false", Some(false))]
    #[case("no", Some(false))]
    #[case("0", Some(false))]
    #[case("maybe", None)]
    fn env_bool_parsing(#[case] raw: &str, #[case] expected: Option<bool>) {
        let parsed = ConfigValue::parse_env(ConfigType::Bool, raw);
        assert_eq!(parsed.and_then(|v| v.as_bool()), expected);
    }

    #[test]
    fn env_list_accepts_json_and_csv() {
        let json = ConfigValue::parse_env(ConfigType::List, r#"["--a", "--b"]"#).unwrap();
        assert_eq!(json.as_list().unwrap(), ["--a", "--b"]);

        let csv = ConfigValue::parse_env(ConfigType::List, "--a, --b").unwrap();
        assert_eq!(csv.as_list().unwrap(), ["--a", "--b"]);

        let empty = ConfigValue::parse_env(ConfigType::List, "").unwrap();
        assert_eq!(empty.as_list().unwrap().len(), 0);
    }

    #[test]
    fn toml_values_are_checked_against_declared_type() {
        let ok = ConfigValue::from_toml(ConfigType::Int, &toml::Value::Integer(9));
        assert_eq!(ok, Some(ConfigValue::Int(9)));

        let bad = ConfigValue::from_toml(ConfigType::Int, &toml::Value::String("9".into()));
        assert_eq!(bad, None);
    }

    #[test]
    fn field_matches_name_and_aliases() {
        let field = ConfigField::constant("YTDLP_BINARY", ConfigValue::Str("yt-dlp".into()))
            .with_aliases(&["YOUTUBEDL_BINARY"]);
        assert!(field.matches("YTDLP_BINARY"));
        assert!(field.matches("YOUTUBEDL_BINARY"));
        assert!(!field.matches("WGET_BINARY"));
    }

    #[test]
    fn section_names_round_trip() {
        for section in ConfigSection::ALL {
            assert_eq!(ConfigSection::from_name(section.as_str()), Some(section));
        }
        assert_eq!(ConfigSection::from_name("NOT_A_SECTION"), None);
    }
}
