//! CLI-specific error types and exit code mapping

use std::path::PathBuf;

use pfstat_core::error::PfstatError;
use pfstat_status::StatusError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The status dump could not be read.
    #[error("failed to read status dump {}: {source}", path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The status dump does not match the record layout.
    #[error("{0}")]
    Malformed(#[from] StatusError),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from pfstat-core.
    #[error("{0}")]
    Core(#[from] PfstatError),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                      |
    /// |------|------------------------------|
    /// | 0    | Success                      |
    /// | 1    | General / command error      |
    /// | 2    | Configuration error          |
    /// | 5    | Malformed status record      |
    /// | 10   | IO error                     |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(PfstatError::Config(_)) => 2,
            Self::Malformed(_) | Self::Core(PfstatError::Decode(_)) => 5,
            Self::Dump { .. } | Self::Io(_) | Self::Core(PfstatError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}
