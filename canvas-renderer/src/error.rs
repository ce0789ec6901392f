//! Renderer error types.

use canvas_core::Notice;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while composing, capturing or saving a scene.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The gallery refused write access.
    #[error("Gallery permission denied")]
    PermissionDenied,

    /// The scene could not be rasterized.
    #[error("Capture failed: {0}")]
    Capture(String),

    /// The artifact could not be persisted.
    #[error("Failed to save export: {0}")]
    Persist(String),

    /// Resource loading failed.
    #[error("Failed to load resource: {0}")]
    Resource(String),
}

impl From<&RenderError> for Notice {
    fn from(error: &RenderError) -> Self {
        match error {
            RenderError::PermissionDenied => Self::gallery_permission_required(),
            RenderError::Capture(_) | RenderError::Persist(_) | RenderError::Resource(_) => {
                Self::save_failed()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices() {
        assert_eq!(
            Notice::from(&RenderError::PermissionDenied),
            Notice::gallery_permission_required()
        );
        assert_eq!(
            Notice::from(&RenderError::Capture("boom".to_string())),
            Notice::new("Error", "Could not save image.")
        );
        assert_eq!(
            Notice::from(&RenderError::Persist("disk full".to_string())),
            Notice::save_failed()
        );
    }
}
