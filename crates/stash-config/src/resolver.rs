//! Configuration resolution with fixed layer precedence.
//!
//! `ConfigResolver` merges three layers in ascending precedence —
//! schema constant defaults, persisted config file, environment — then
//! evaluates deferred computed defaults in dependency order. The result
//! is frozen; the only sanctioned mutation path is
//! [`ConfigResolver::update_in_place`], which writes overrides into the
//! process environment and re-runs the whole resolution.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::schema::{ConfigDefault, ConfigField, ConfigSchema, ConfigType, ConfigValue};
use crate::sources::ConfigSources;

/// Flat name -> value mapping shared between config sets.
///
/// The registry accumulates one of these across config sets so a later
/// set's computed defaults can read an earlier set's final values.
pub type FlatConfig = BTreeMap<String, ConfigValue>;

/// Read-only view over resolved values, handed to computed-default
/// functions.
#[derive(Debug, Clone, Copy)]
pub struct ConfigSnapshot<'a> {
    values: &'a FlatConfig,
}

impl<'a> ConfigSnapshot<'a> {
    pub fn new(values: &'a FlatConfig) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&'a ConfigValue> {
        self.values.get(name)
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.typed(name, ConfigType::Bool, |v| v.as_bool())
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.typed(name, ConfigType::Int, |v| v.as_int())
    }

    pub fn str(&self, name: &str) -> Result<&'a str> {
        self.typed(name, ConfigType::Str, |v| v.as_str())
    }

    pub fn list(&self, name: &str) -> Result<&'a [String]> {
        self.typed(name, ConfigType::List, |v| v.as_list())
    }

    pub fn path(&self, name: &str) -> Result<PathBuf> {
        self.typed(name, ConfigType::Path, |v| v.as_path().cloned())
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: ConfigType,
        extract: impl Fn(&'a ConfigValue) -> Option<T>,
    ) -> Result<T> {
        let value = self
            .values
            .get(name)
            .ok_or_else(|| ConfigError::missing(name))?;
        extract(value)
            .ok_or_else(|| ConfigError::mismatch(name, expected, value.type_of().to_string()))
    }
}

/// Immutable-after-construction mapping from field name to final value.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    values: FlatConfig,
}

impl ResolvedConfig {
    pub fn get(&self, name: &str) -> Option<&ConfigValue> {
        self.values.get(name)
    }

    pub fn bool(&self, name: &str) -> Result<bool> {
        self.snapshot().bool(name)
    }

    pub fn int(&self, name: &str) -> Result<i64> {
        self.snapshot().int(name)
    }

    pub fn str(&self, name: &str) -> Result<String> {
        self.snapshot().str(name).map(str::to_string)
    }

    pub fn list(&self, name: &str) -> Result<Vec<String>> {
        self.snapshot().list(name).map(<[String]>::to_vec)
    }

    pub fn path(&self, name: &str) -> Result<PathBuf> {
        self.snapshot().path(name)
    }

    pub fn snapshot(&self) -> ConfigSnapshot<'_> {
        ConfigSnapshot::new(&self.values)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    pub fn into_values(self) -> FlatConfig {
        self.values
    }
}

/// Resolves one config set against its sources.
pub struct ConfigResolver<'a> {
    schema: &'a ConfigSchema,
    context: FlatConfig,
}

impl<'a> ConfigResolver<'a> {
    pub fn new(schema: &'a ConfigSchema) -> Self {
        Self {
            schema,
            context: FlatConfig::new(),
        }
    }

    /// Resolver whose computed defaults may also read `context`: the
    /// accumulated final values of previously resolved config sets.
    pub fn with_context(schema: &'a ConfigSchema, context: FlatConfig) -> Self {
        Self { schema, context }
    }

    /// Merge layers and evaluate deferred defaults.
    ///
    /// Precedence among enabled layers is always defaults -> file ->
    /// environment; a layer a schema opts out of is skipped, never
    /// reordered.
    pub fn resolve(&self, sources: &ConfigSources) -> Result<ResolvedConfig> {
        let schema = self.schema;
        let mut work = self.context.clone();
        let mut pending: Vec<&ConfigField> = Vec::new();

        for field in &schema.fields {
            if let Some(value) = self.layered_value(field, sources)? {
                work.insert(field.name.to_string(), value);
                continue;
            }
            match (&field.default, schema.load_from_defaults) {
                (Some(ConfigDefault::Computed { .. }), true) => pending.push(field),
                _ => return Err(ConfigError::missing(field.name)),
            }
        }

        // Second pass: computed defaults, dependency-ordered, exact
        // cycle detection over the declared edges.
        let pending_map: BTreeMap<&str, &ConfigField> =
            pending.iter().map(|f| (f.name, *f)).collect();
        let mut stack: Vec<&str> = Vec::new();
        for field in &pending {
            evaluate_computed(field, &pending_map, &mut work, &mut stack)?;
        }

        let mut values = FlatConfig::new();
        for field in &schema.fields {
            if let Some(value) = work.get(field.name) {
                values.insert(field.name.to_string(), value.clone());
            }
        }
        tracing::debug!(schema = schema.name, fields = values.len(), "Resolved config set");
        Ok(ResolvedConfig { values })
    }

    /// Re-resolve with extra overrides applied first.
    ///
    /// Overrides are written into the process environment so they
    /// propagate to spawned subprocesses and survive later rebuilds.
    /// Must be called from the single-threaded startup/operator path:
    /// mutating the environment while other threads read it is undefined
    /// on some platforms.
    pub fn update_in_place(
        &self,
        sources: &mut ConfigSources,
        overrides: &[(&str, String)],
    ) -> Result<ResolvedConfig> {
        for (key, value) in overrides {
            tracing::warn!(key, value = value.as_str(), "Overriding config value at runtime");
            unsafe { std::env::set_var(key, value) };
            sources.set_env(*key, value.clone());
        }
        self.resolve(sources)
    }

    /// Pick the highest-precedence enabled layer that defines `field`.
    ///
    /// Aliases are honored in the config-file layer as well as the
    /// environment. Migrated legacy files keep their old key names
    /// verbatim, so a file saying `SAVE_MEDIA` must keep steering
    /// `USE_YTDLP` without a hand-edit after migration.
    fn layered_value(
        &self,
        field: &ConfigField,
        sources: &ConfigSources,
    ) -> Result<Option<ConfigValue>> {
        let keys = std::iter::once(field.name).chain(field.aliases.iter().copied());

        if self.schema.load_from_environment {
            for key in keys.clone() {
                if let Some(raw) = sources.env_value(key) {
                    let value = ConfigValue::parse_env(field.ty, raw)
                        .ok_or_else(|| ConfigError::mismatch(field.name, field.ty, raw))?;
                    return Ok(Some(value));
                }
            }
        }

        if self.schema.load_from_configfile {
            for key in keys {
                if let Some(raw) = sources.file_value(key) {
                    let value = ConfigValue::from_toml(field.ty, raw).ok_or_else(|| {
                        ConfigError::mismatch(field.name, field.ty, raw.to_string())
                    })?;
                    return Ok(Some(value));
                }
            }
        }

        if self.schema.load_from_defaults {
            if let Some(ConfigDefault::Constant(value)) = &field.default {
                return Ok(Some(value.clone()));
            }
        }

        Ok(None)
    }
}

/// Depth-first evaluation of one pending computed default.
///
/// `stack` carries the chain of fields currently being evaluated; seeing
/// a field twice means the declared dependencies loop.
fn evaluate_computed<'f>(
    field: &'f ConfigField,
    pending: &BTreeMap<&str, &'f ConfigField>,
    work: &mut FlatConfig,
    stack: &mut Vec<&'f str>,
) -> Result<()> {
    if work.contains_key(field.name) {
        return Ok(());
    }
    if let Some(pos) = stack.iter().position(|name| *name == field.name) {
        let mut fields: Vec<String> = stack[pos..].iter().map(|s| s.to_string()).collect();
        fields.push(field.name.to_string());
        return Err(ConfigError::DefaultCycle { fields });
    }

    let Some(ConfigDefault::Computed {
        depends_on,
        compute,
    }) = &field.default
    else {
        return Ok(());
    };

    stack.push(field.name);
    for dep in *depends_on {
        if let Some(dep_field) = pending.get(dep) {
            evaluate_computed(dep_field, pending, work, stack)?;
        }
        // deps outside the pending set are either already final in
        // `work` or genuinely absent; compute surfaces the latter
    }

    let value = {
        let snapshot = ConfigSnapshot::new(work);
        (compute)(&snapshot)?
    };
    if value.type_of() != field.ty {
        return Err(ConfigError::mismatch(
            field.name,
            field.ty,
            value.type_of().to_string(),
        ));
    }
    work.insert(field.name.to_string(), value);
    stack.pop();
    Ok(())
}
