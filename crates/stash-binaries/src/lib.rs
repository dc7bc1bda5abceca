//! External binary provisioning for Stash.
//!
//! Every extractor depends on external tools (wget, yt-dlp, a chrome
//! build, ffmpeg). A [`binary::Binary`] names one such tool and ranks
//! the [`provider::BinProvider`]s allowed to supply it; the
//! [`resolver::BinaryResolver`] probes providers in order, installs on
//! demand, and caches the resolved absolute path and version for the
//! lifetime of the process.

pub mod binary;
pub mod error;
pub mod pattern;
pub mod provider;
pub mod providers;
pub mod resolver;

pub use binary::{Binary, BinaryInfo, ProviderOverride};
pub use error::{Error, Result};
pub use provider::BinProvider;
pub use resolver::BinaryResolver;
