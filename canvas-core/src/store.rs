//! Shared canvas storage for multi-threaded hosts.
//!
//! [`CanvasStore`] serializes every mutation through one write lock, so a
//! commit always reads the current live values and writes the whole transform
//! without interleaving with another writer.

use std::sync::{Arc, PoisonError, RwLock};

use crate::media::{pick_image_source, MediaSource};
use crate::{
    Canvas, CanvasConfig, CanvasResult, Element, ElementId, ElementKind, InputEvent, Registry,
    SceneSnapshot,
};

/// Thread-safe handle to a [`Canvas`]. Clones share the same canvas.
///
/// # Example
///
/// ```
/// use canvas_core::{CanvasConfig, CanvasStore, ElementKind};
///
/// let store = CanvasStore::new(CanvasConfig::default());
/// let id = store.add(ElementKind::Rectangle);
/// assert!(store.read(|canvas| canvas.registry().contains(id)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    canvas: Arc<RwLock<Canvas>>,
}

impl CanvasStore {
    /// Create a store around an empty canvas.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self::from_canvas(Canvas::new(config))
    }

    /// Create a store around an existing canvas.
    #[must_use]
    pub fn from_canvas(canvas: Canvas) -> Self {
        Self {
            canvas: Arc::new(RwLock::new(canvas)),
        }
    }

    /// Run a closure with shared access to the canvas.
    pub fn read<R>(&self, f: impl FnOnce(&Canvas) -> R) -> R {
        let canvas = self.canvas.read().unwrap_or_else(PoisonError::into_inner);
        f(&canvas)
    }

    /// Run a closure with exclusive access to the canvas.
    pub fn update<R>(&self, f: impl FnOnce(&mut Canvas) -> R) -> R {
        let mut canvas = self.canvas.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut canvas)
    }

    /// Add an element as given. Text keeps the label it carries.
    pub fn add(&self, kind: ElementKind) -> ElementId {
        self.update(|canvas| canvas.add(kind))
    }

    /// Add a text element with the configured default label.
    pub fn add_text(&self) -> ElementId {
        self.update(Canvas::add_text)
    }

    /// Ask the media source for an image and add it.
    ///
    /// The lock is not held while the picker is open. Returns `None` if the
    /// user canceled.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::MediaPermissionDenied`](crate::CanvasError::MediaPermissionDenied)
    /// if read access is refused; the canvas is left untouched.
    pub async fn add_image_from(&self, source: &dyn MediaSource) -> CanvasResult<Option<ElementId>> {
        let picked = pick_image_source(source).await?;
        Ok(picked.map(|uri| self.update(|canvas| canvas.add_image(uri))))
    }

    /// Process an input event under the write lock.
    pub fn process_event(&self, event: &InputEvent) -> bool {
        self.update(|canvas| canvas.process_event(event))
    }

    /// Remove the selected element.
    pub fn remove_selected(&self) -> Option<Element> {
        self.update(Canvas::remove_selected)
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.read(Canvas::selected)
    }

    /// Copy of one stored element.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.read(|canvas| canvas.registry().get(id).cloned())
    }

    /// Copy of the authoritative registry.
    #[must_use]
    pub fn registry(&self) -> Registry {
        self.read(|canvas| canvas.registry().clone())
    }

    /// The current frame, taken under the read lock.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        self.read(Canvas::snapshot)
    }
}
