//! Error types for stash-binaries

/// Result type for stash-binaries operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating or installing binaries
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No configured provider could locate or install the binary.
    /// Callers that can degrade (disable one extractor) should catch
    /// this; it is never cached.
    #[error("Binary not found: {name} (providers tried: {providers})")]
    BinaryNotFound { name: String, providers: String },

    /// The installer subprocess exited non-zero. Captured output is
    /// carried along so it always reaches the operator.
    #[error(
        "{provider} installer exited with {code:?} while installing {packages:?}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}"
    )]
    InstallFailed {
        provider: String,
        packages: Vec<String>,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Provider can only locate, never install (e.g. the raw-PATH provider).
    #[error("Provider {provider} cannot install binaries")]
    InstallNotSupported { provider: String },

    /// A fixed-binary provider was asked for something it does not carry.
    /// This is a caller contract violation, not a soft miss.
    #[error("Provider {provider} only supports '{supported}', got '{requested}'")]
    UnsupportedBinary {
        provider: String,
        supported: String,
        requested: String,
    },

    /// The installer succeeded but no binary appeared where expected.
    #[error("{provider} install of {name} finished but the binary was not found afterwards")]
    InstallProducedNothing { provider: String, name: String },

    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Fs(#[from] stash_fs::Error),
}
