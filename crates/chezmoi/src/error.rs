//! Error types for the command-runner boundary

use thiserror::Error;

/// Errors that can occur at the process boundary.
///
/// Note that an external command *failing* (non-zero exit) is not an
/// error here: failures travel back as [`crate::CommandOutput`] with
/// `success == false` and their stderr text is surfaced as a notice.
/// Only not being able to run the command at all is an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    /// The chezmoi binary could not be resolved on PATH
    #[error("chezmoi binary not found: {0}")]
    BinaryNotFound(#[from] which::Error),

    /// Spawning the external process failed
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        /// The command line that failed to spawn
        command: String,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
