//! Layered configuration for Stash.
//!
//! A config set is declared as a [`schema::ConfigSchema`]: named, typed
//! fields whose defaults are either constants or functions of other
//! already-resolved fields. [`resolver::ConfigResolver`] merges three
//! layers in fixed precedence (schema defaults, the persisted
//! `Stash.conf` TOML file, process environment variables) and then
//! evaluates deferred defaults in dependency order.
//!
//! [`migrate::ensure_structured`] upgrades a legacy flat-INI config file
//! to the structured TOML form in place, keeping a backup of the
//! original bytes.

pub mod coerce;
pub mod error;
pub mod migrate;
pub mod resolver;
pub mod schema;
pub mod sources;

pub use error::{ConfigError, Result};
pub use migrate::{MigrationOutcome, ensure_structured};
pub use resolver::{ConfigResolver, ConfigSnapshot, FlatConfig, ResolvedConfig};
pub use schema::{ConfigDefault, ConfigField, ConfigSchema, ConfigSection, ConfigType, ConfigValue};
pub use sources::ConfigSources;
