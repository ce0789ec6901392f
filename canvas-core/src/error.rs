//! Error types for canvas operations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Updates aimed at elements that no longer exist are not errors: the
/// registry tolerates them as no-ops.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// The media source refused read access.
    #[error("Media library permission denied")]
    MediaPermissionDenied,

    /// A registry snapshot was structurally invalid.
    #[error("Invalid registry snapshot: {0}")]
    InvalidSnapshot(String),

    /// Registry serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A user-visible alert: a short title and a one-line message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Alert title.
    pub title: String,
    /// Alert body.
    pub message: String,
}

impl Notice {
    /// Create a notice.
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Reading from the media library was refused.
    #[must_use]
    pub fn media_permission_required() -> Self {
        Self::new("Permission required", "Cannot access gallery.")
    }

    /// Writing to the gallery was refused.
    #[must_use]
    pub fn gallery_permission_required() -> Self {
        Self::new("Permission required", "Cannot save image.")
    }

    /// Capturing or saving the export failed.
    #[must_use]
    pub fn save_failed() -> Self {
        Self::new("Error", "Could not save image.")
    }

    /// The export was saved.
    #[must_use]
    pub fn saved() -> Self {
        Self::new("Saved!", "Canvas image saved to gallery.")
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&CanvasError> for Notice {
    fn from(error: &CanvasError) -> Self {
        match error {
            CanvasError::MediaPermissionDenied => Self::media_permission_required(),
            CanvasError::InvalidSnapshot(_) | CanvasError::Serialization(_) => {
                Self::new("Error", error.to_string())
            }
        }
    }
}
