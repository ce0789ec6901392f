//! Canvas export to the gallery.
//!
//! The flow is permission, capture, save. Capture reads a snapshot, so an
//! export never mutates the registry or disturbs an in-progress gesture. Every
//! outcome is reported to the user as a [`Notice`].

use canvas_core::{CanvasStore, Notice, SceneSnapshot};

use crate::capture::Capture;
use crate::error::{RenderError, RenderResult};
use crate::persist::{Persistence, SavedAsset};

/// Album exports are saved into unless configured otherwise.
pub const DEFAULT_ALBUM: &str = "DesignExports";

/// Captures the canvas and persists the result.
pub struct ExportPipeline<C, P> {
    capture: C,
    persistence: P,
    album: String,
}

impl<C: Capture, P: Persistence> ExportPipeline<C, P> {
    /// Create a pipeline saving into [`DEFAULT_ALBUM`].
    #[must_use]
    pub fn new(capture: C, persistence: P) -> Self {
        Self {
            capture,
            persistence,
            album: DEFAULT_ALBUM.to_string(),
        }
    }

    /// Save into a different album.
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// The target album name.
    #[must_use]
    pub fn album(&self) -> &str {
        &self.album
    }

    /// The persistence collaborator.
    #[must_use]
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    /// Export an already-taken snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::PermissionDenied`] before capturing anything if
    /// write access is refused, otherwise any capture or save failure.
    pub async fn export_scene(&self, scene: &SceneSnapshot) -> RenderResult<SavedAsset> {
        self.ensure_permission().await?;
        self.capture_and_save(scene).await
    }

    /// Export the store's current frame.
    ///
    /// Permission is asked first; the frame is taken only once it is granted,
    /// so it reflects any edits made while the prompt was open.
    ///
    /// # Errors
    ///
    /// See [`ExportPipeline::export_scene`].
    pub async fn export(&self, store: &CanvasStore) -> RenderResult<SavedAsset> {
        self.ensure_permission().await?;
        self.capture_and_save(&store.snapshot()).await
    }

    /// Export and turn the outcome into a user-facing notice.
    pub async fn export_and_notify(&self, store: &CanvasStore) -> Notice {
        match self.export(store).await {
            Ok(_) => Notice::saved(),
            Err(e) => {
                if !matches!(e, RenderError::PermissionDenied) {
                    tracing::error!("Export failed: {e}");
                }
                Notice::from(&e)
            }
        }
    }

    async fn ensure_permission(&self) -> RenderResult<()> {
        if self.persistence.request_permission().await.is_granted() {
            Ok(())
        } else {
            tracing::warn!("Gallery permission denied, export skipped");
            Err(RenderError::PermissionDenied)
        }
    }

    async fn capture_and_save(&self, scene: &SceneSnapshot) -> RenderResult<SavedAsset> {
        let artifact = self.capture.capture(scene)?;
        let saved = self.persistence.save(&artifact, &self.album).await?;
        tracing::info!(
            "Exported {}x{} canvas to {}",
            artifact.width,
            artifact.height,
            saved.location
        );
        Ok(saved)
    }
}
