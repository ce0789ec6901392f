//! Studio error types.

use thiserror::Error;

/// Result type for studio operations.
pub type StudioResult<T> = Result<T, StudioError>;

/// Errors that can occur while loading a script.
///
/// Failures while replaying a script are reported as notices instead.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The script file could not be read.
    #[error("Failed to read script: {0}")]
    Io(#[from] std::io::Error),

    /// The script was not a valid command list.
    #[error("Invalid script: {0}")]
    Parse(#[from] serde_json::Error),
}
