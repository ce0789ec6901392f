//! The canvas editor: registry, gesture controllers and selection wired together.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element::DEFAULT_TEXT_LABEL;
use crate::gesture::Commit;
use crate::{
    Element, ElementId, ElementKind, GestureController, InputEvent, PanPhase, PinchPhase,
    Registry, Selection, TextMode, Transform,
};

/// Canvas configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Label given to new text elements.
    pub default_label: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 640.0,
            default_label: DEFAULT_TEXT_LABEL.to_string(),
        }
    }
}

/// Everything needed to draw one frame: viewport plus elements in paint order
/// with live transforms and text drafts applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    /// Viewport width in pixels.
    pub width: f32,
    /// Viewport height in pixels.
    pub height: f32,
    /// Elements in paint order.
    pub elements: Vec<Element>,
}

/// The complete editor state.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    config: CanvasConfig,
    registry: Registry,
    selection: Selection,
    controllers: HashMap<ElementId, GestureController>,
}

impl Canvas {
    /// Create an empty canvas.
    #[must_use]
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            registry: Registry::new(),
            selection: Selection::new(),
            controllers: HashMap::new(),
        }
    }

    /// Create a canvas around an existing registry (e.g. one loaded from JSON).
    #[must_use]
    pub fn with_registry(config: CanvasConfig, registry: Registry) -> Self {
        Self {
            registry,
            ..Self::new(config)
        }
    }

    /// Canvas configuration.
    #[must_use]
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Read access to the authoritative elements.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Read access to selection and edit focus.
    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selection.selected()
    }

    // -----------------------------------------------------------------------
    // Toolbar
    // -----------------------------------------------------------------------

    /// Add an element exactly as given, including any text label.
    pub fn add(&mut self, kind: ElementKind) -> ElementId {
        self.registry.add(kind)
    }

    /// Add a text element with the configured default label.
    pub fn add_text(&mut self) -> ElementId {
        self.registry.add(ElementKind::Text {
            label: self.config.default_label.clone(),
        })
    }

    /// Add a rectangle.
    pub fn add_rectangle(&mut self) -> ElementId {
        self.registry.add(ElementKind::Rectangle)
    }

    /// Add a circle.
    pub fn add_circle(&mut self) -> ElementId {
        self.registry.add(ElementKind::Circle)
    }

    /// Add an image for an already picked source reference.
    pub fn add_image(&mut self, source: impl Into<String>) -> ElementId {
        self.registry.add(ElementKind::image(source))
    }

    /// Remove the selected element and clear the selection.
    ///
    /// An open edit on the removed element is discarded. Returns the removed
    /// element, or `None` if nothing was selected.
    pub fn remove_selected(&mut self) -> Option<Element> {
        let id = self.selection.selected()?;
        if self.selection.editing() == Some(id) {
            self.selection.finish_edit();
        }
        self.controllers.remove(&id);
        let removed = self.registry.remove(id);
        self.selection.clear();
        removed
    }

    // -----------------------------------------------------------------------
    // Selection and text editing
    // -----------------------------------------------------------------------

    /// Select an element. Any open edit on another element is committed first.
    ///
    /// Returns `false` if the element does not exist.
    pub fn select(&mut self, id: ElementId) -> bool {
        if !self.registry.contains(id) {
            tracing::debug!("Select of missing element {id} ignored");
            return false;
        }
        if self.selection.editing().is_some_and(|editing| editing != id) {
            self.commit_edit();
        }
        self.selection.select(id);
        true
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Handle a tap on an element.
    ///
    /// Tapping selects. Tapping a text element in display mode also opens an
    /// edit seeded with its label.
    pub fn tap(&mut self, id: ElementId) -> bool {
        if !self.select(id) {
            return false;
        }
        if self.selection.mode(id) == TextMode::Display {
            if let Some(label) = self.registry.get(id).and_then(Element::label) {
                let label = label.to_string();
                self.selection.begin_edit(id, &label);
            }
        }
        true
    }

    /// Replace the draft of the open edit.
    pub fn edit_text(&mut self, text: &str) -> bool {
        self.selection.set_draft(text)
    }

    /// Focus left the text input: commit the draft and return to display mode.
    pub fn blur(&mut self) -> bool {
        self.commit_edit()
    }

    /// Display mode of an element.
    #[must_use]
    pub fn text_mode(&self, id: ElementId) -> TextMode {
        self.selection.mode(id)
    }

    fn commit_edit(&mut self) -> bool {
        match self.selection.finish_edit() {
            Some(edit) => self.registry.update_label(edit.id, &edit.draft),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // Gestures
    // -----------------------------------------------------------------------

    /// Feed a pan event for an element. Returns `true` if a commit landed.
    pub fn pan(&mut self, id: ElementId, phase: PanPhase) -> bool {
        let commit = self.controller(id).and_then(|c| c.pan(phase));
        commit.is_some_and(|c| self.commit(c))
    }

    /// Feed a pinch event for an element. Returns `true` if a commit landed.
    pub fn pinch(&mut self, id: ElementId, phase: PinchPhase) -> bool {
        let commit = self.controller(id).and_then(|c| c.pinch(phase));
        commit.is_some_and(|c| self.commit(c))
    }

    /// Write a gesture's final transform into the registry.
    ///
    /// Commits for elements that were removed mid-gesture are dropped.
    pub fn commit(&mut self, commit: Commit) -> bool {
        let t = commit.transform;
        let scalable = self
            .registry
            .get(commit.id)
            .is_some_and(|e| e.kind.is_scalable());
        if scalable {
            self.registry.update_transform(commit.id, t.x, t.y, t.scale)
        } else {
            self.registry.update_position(commit.id, t.x, t.y)
        }
    }

    /// The transform to render for an element: live while a gesture runs,
    /// committed otherwise.
    #[must_use]
    pub fn live_transform(&self, id: ElementId) -> Option<Transform> {
        let element = self.registry.get(id)?;
        Some(
            self.controllers
                .get(&id)
                .filter(|c| !c.is_idle())
                .map_or(element.transform, GestureController::live),
        )
    }

    /// The controller for an element, created on first use and synced with
    /// the registry while idle.
    fn controller(&mut self, id: ElementId) -> Option<&mut GestureController> {
        let Some(element) = self.registry.get(id) else {
            tracing::debug!("Gesture on missing element {id} ignored");
            return None;
        };
        let committed = element.transform;
        let scalable = element.kind.is_scalable();
        let controller = self
            .controllers
            .entry(id)
            .or_insert_with(|| GestureController::new(id, committed, scalable));
        controller.sync(committed);
        Some(controller)
    }

    // -----------------------------------------------------------------------
    // Input routing and rendering
    // -----------------------------------------------------------------------

    /// Process an input event. Returns `true` if it changed editor state.
    pub fn process_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Tap { target } => self.tap(*target),
            InputEvent::TapAt { x, y } => match self.element_at(*x, *y) {
                Some(id) => self.tap(id),
                None => false,
            },
            InputEvent::Pan { target, phase } => {
                self.pan(*target, *phase);
                self.registry.contains(*target)
            }
            InputEvent::Pinch { target, phase } => {
                self.pinch(*target, *phase);
                self.registry.contains(*target)
            }
            InputEvent::TextInput { text } => self.edit_text(text),
            InputEvent::Blur => self.blur(),
        }
    }

    /// Find the topmost element at the given canvas coordinates.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        self.snapshot()
            .elements
            .iter()
            .rev()
            .find(|e| e.contains_point(x, y))
            .map(|e| e.id)
    }

    /// Elements in paint order as they should appear right now.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        let elements = self
            .registry
            .paint_order()
            .into_iter()
            .map(|element| {
                let mut frame = element.clone();
                if let Some(transform) = self.live_transform(element.id) {
                    frame.transform = transform;
                }
                if let (Some(draft), ElementKind::Text { label }) =
                    (self.draft_for(element.id), &mut frame.kind)
                {
                    draft.clone_into(label);
                }
                frame
            })
            .collect();
        SceneSnapshot {
            width: self.config.width,
            height: self.config.height,
            elements,
        }
    }

    fn draft_for(&self, id: ElementId) -> Option<&str> {
        (self.selection.editing() == Some(id))
            .then(|| self.selection.draft())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(CanvasConfig::default())
    }

    #[test]
    fn test_tap_text_enters_edit_and_selects() {
        let mut canvas = canvas();
        let id = canvas.add_text();
        assert!(canvas.tap(id));
        assert_eq!(canvas.selected(), Some(id));
        assert_eq!(canvas.text_mode(id), TextMode::Editing);
        assert_eq!(canvas.selection().draft(), Some("New Text"));
    }

    #[test]
    fn test_tap_shape_selects_without_edit() {
        let mut canvas = canvas();
        let id = canvas.add_circle();
        assert!(canvas.tap(id));
        assert_eq!(canvas.selected(), Some(id));
        assert_eq!(canvas.selection().editing(), None);
    }

    #[test]
    fn test_tap_missing_element_ignored() {
        let mut canvas = canvas();
        assert!(!canvas.tap(ElementId::from_raw(99)));
        assert_eq!(canvas.selected(), None);
    }

    #[test]
    fn test_selecting_other_element_commits_open_edit() {
        let mut canvas = canvas();
        let text = canvas.add_text();
        let rect = canvas.add_rectangle();

        canvas.tap(text);
        canvas.edit_text("Draft");
        canvas.tap(rect);

        assert_eq!(canvas.selection().editing(), None);
        assert_eq!(
            canvas.registry().get(text).and_then(Element::label),
            Some("Draft")
        );
    }

    #[test]
    fn test_second_text_takes_edit_focus() {
        let mut canvas = canvas();
        let first = canvas.add_text();
        let second = canvas.add_text();

        canvas.tap(first);
        canvas.edit_text("One");
        canvas.tap(second);

        assert_eq!(canvas.text_mode(first), TextMode::Display);
        assert_eq!(canvas.text_mode(second), TextMode::Editing);
        assert_eq!(
            canvas.registry().get(first).and_then(Element::label),
            Some("One")
        );
    }

    #[test]
    fn test_remove_selected_discards_edit() {
        let mut canvas = canvas();
        let text = canvas.add_text();
        canvas.tap(text);
        canvas.edit_text("never stored");

        let removed = canvas.remove_selected().expect("removed");
        assert_eq!(removed.id, text);
        assert_eq!(canvas.selected(), None);
        assert_eq!(canvas.selection().editing(), None);
        assert!(!canvas.blur());
    }

    #[test]
    fn test_remove_without_selection_is_noop() {
        let mut canvas = canvas();
        canvas.add_rectangle();
        assert!(canvas.remove_selected().is_none());
        assert_eq!(canvas.registry().len(), 1);
    }

    #[test]
    fn test_live_transform_during_pan() {
        let mut canvas = canvas();
        let id = canvas.add_rectangle();
        canvas.pan(id, PanPhase::Begin);
        canvas.pan(
            id,
            PanPhase::Update {
                translation_x: 12.0,
                translation_y: 0.0,
            },
        );

        let live = canvas.live_transform(id).expect("live");
        assert!((live.x - 12.0).abs() < f32::EPSILON);
        let stored = canvas.registry().get(id).expect("stored").transform;
        assert!(stored.x.abs() < f32::EPSILON);
    }

    #[test]
    fn test_second_pan_starts_from_committed_position() {
        let mut canvas = canvas();
        let id = canvas.add_circle();
        for _ in 0..2 {
            canvas.pan(id, PanPhase::Begin);
            canvas.pan(
                id,
                PanPhase::Update {
                    translation_x: 10.0,
                    translation_y: 5.0,
                },
            );
            assert!(canvas.pan(id, PanPhase::End));
        }
        let t = canvas.registry().get(id).expect("element").transform;
        assert!((t.x - 20.0).abs() < f32::EPSILON);
        assert!((t.y - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_snapshot_shows_draft_and_live_values() {
        let mut canvas = canvas();
        let text = canvas.add_text();
        canvas.tap(text);
        canvas.edit_text("Typing");
        canvas.pan(text, PanPhase::Begin);
        canvas.pan(
            text,
            PanPhase::Update {
                translation_x: 3.0,
                translation_y: 4.0,
            },
        );

        let snapshot = canvas.snapshot();
        let frame = &snapshot.elements[0];
        assert_eq!(frame.label(), Some("Typing"));
        assert!((frame.transform.y - 4.0).abs() < f32::EPSILON);
        assert_eq!(
            canvas.registry().get(text).and_then(Element::label),
            Some("New Text")
        );
    }

    #[test]
    fn test_tap_at_hits_topmost() {
        let mut canvas = canvas();
        let rect = canvas.add_rectangle();
        let circle = canvas.add_circle();
        assert!(canvas.process_event(&InputEvent::TapAt { x: 50.0, y: 50.0 }));
        // Circles paint after rectangles, so the circle is on top.
        assert_eq!(canvas.selected(), Some(circle));
        assert_ne!(canvas.selected(), Some(rect));
        assert!(!canvas.process_event(&InputEvent::TapAt { x: 300.0, y: 600.0 }));
    }
}
