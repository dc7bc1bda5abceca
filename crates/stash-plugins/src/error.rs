//! Error types for stash-plugins

/// Result type for stash-plugins operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the plugin registry
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] stash_config::ConfigError),

    #[error(transparent)]
    Binary(#[from] stash_binaries::Error),
}
