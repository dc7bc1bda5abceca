//! Built-in plugin registry for Stash.
//!
//! Plugins bundle the three things an extractor or package manager
//! contributes: config sets ([`stash_config::ConfigSchema`]), binary
//! descriptors ([`stash_binaries::Binary`]), and provider mechanisms
//! ([`stash_binaries::provider::BinProvider`]). [`Registry::builtin`]
//! enumerates them statically in dependency order; there is no runtime
//! discovery.

mod builtin;
pub mod error;
pub mod hook;
pub mod registry;

pub use error::{Error, Result};
pub use hook::{Hook, Plugin};
pub use registry::Registry;
