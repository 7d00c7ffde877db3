//! Error types for the Elm adapter.

use std::path::PathBuf;

/// All errors that can surface from adapter operations.
///
/// Manifest read/parse failures are deliberately absent: configuration
/// resolution recovers from them locally (see [`crate::manifest`]).
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The external compiler binary was not found on `PATH`.
    #[error("compiler not found: {binary} (install from {install_hint})")]
    CompilerNotFound {
        /// The binary that was looked up.
        binary: String,
        /// Where to obtain it.
        install_hint: String,
    },

    /// The compiler subprocess exited non-zero.
    #[error("compile failed with exit code {status}: {stderr}")]
    CompileFailed {
        /// Exit code, `-1` when terminated by signal.
        status: i32,
        /// Captured standard-error text.
        stderr: String,
    },

    /// The compiler reported success but the artifact could not be read back.
    #[error("failed to read artifact {path}: {source}")]
    ArtifactRead {
        /// Expected artifact location.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Scanning the configured source directories failed.
    #[error("dependency scan failed: {0}")]
    DependencyScan(String),

    /// The blocking compile task could not be joined.
    #[error("compile task failed: {0}")]
    TaskFailed(String),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
