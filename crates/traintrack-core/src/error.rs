//! Error types for traintrack.

use thiserror::Error;

/// Result type alias for traintrack operations.
pub type Result<T> = std::result::Result<T, TrackError>;

/// Main error type for traintrack operations.
#[derive(Error, Debug)]
pub enum TrackError {
    /// I/O errors (metrics files, temp files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A shell command exited with a non-zero status.
    #[error("Command `{command}` failed with status {code:?}: {stderr}")]
    Command {
        /// The command line that was run.
        command: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Captured standard error output.
        stderr: String,
    },
}
