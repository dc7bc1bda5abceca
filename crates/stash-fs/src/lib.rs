//! Filesystem primitives for Stash.
//!
//! This crate owns the on-disk layout of a Stash data directory and the
//! atomic-write helpers used whenever the config file is rewritten.

pub mod error;
pub mod io;
pub mod layout;

pub use error::{Error, Result};
pub use io::{write_atomic, write_atomic_locked};
pub use layout::DataLayout;
