//! Selection and text edit focus.
//!
//! One element at most is selected, and one text element at most is being
//! edited. The [`Canvas`](crate::Canvas) keeps both consistent with the
//! registry; this type only tracks the state.

use serde::{Deserialize, Serialize};

use crate::ElementId;

/// Display mode of a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Label shown as static text.
    Display,
    /// Label shown as a focused text input.
    Editing,
}

/// An open text edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// The text element being edited.
    pub id: ElementId,
    /// Current contents of the input, not yet committed.
    pub draft: String,
}

/// Selected element and edit focus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<ElementId>,
    editing: Option<TextEdit>,
}

impl Selection {
    /// No selection and no edit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected element, if any.
    #[must_use]
    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    /// Check whether `id` is the selected element.
    #[must_use]
    pub fn is_selected(&self, id: ElementId) -> bool {
        self.selected == Some(id)
    }

    /// Overwrite the selection.
    pub fn select(&mut self, id: ElementId) {
        self.selected = Some(id);
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// The element being edited, if any.
    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.editing.as_ref().map(|edit| edit.id)
    }

    /// The draft of the open edit, if any.
    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        self.editing.as_ref().map(|edit| edit.draft.as_str())
    }

    /// Display mode of a text element.
    #[must_use]
    pub fn mode(&self, id: ElementId) -> TextMode {
        if self.editing() == Some(id) {
            TextMode::Editing
        } else {
            TextMode::Display
        }
    }

    /// Open an edit seeded with the current label.
    ///
    /// Returns the edit it replaced, which the caller must commit.
    pub fn begin_edit(&mut self, id: ElementId, label: &str) -> Option<TextEdit> {
        self.editing.replace(TextEdit {
            id,
            draft: label.to_string(),
        })
    }

    /// Replace the draft of the open edit. Returns `false` if nothing is edited.
    pub fn set_draft(&mut self, text: &str) -> bool {
        match self.editing.as_mut() {
            Some(edit) => {
                text.clone_into(&mut edit.draft);
                true
            }
            None => false,
        }
    }

    /// Close the open edit, handing it back for commit.
    pub fn finish_edit(&mut self) -> Option<TextEdit> {
        self.editing.take()
    }
}
