//! Script replay.
//!
//! A script is a JSON array of commands, one per toolbar press, tap, text
//! change or gesture phase:
//!
//! ```json
//! [
//!   { "command": "add_rectangle" },
//!   { "command": "pan", "target": "last", "phase": "begin" },
//!   { "command": "pan", "target": "last", "phase": "update", "dx": 50, "dy": -20 },
//!   { "command": "pan", "target": "last", "phase": "end" },
//!   { "command": "export" }
//! ]
//! ```

use std::path::Path;

use canvas_core::{
    CanvasStore, ElementId, ElementKind, InputEvent, Notice, PanPhase, Permission, PinchPhase,
};
use canvas_renderer::{Capture, ExportPipeline, Persistence};
use serde::{Deserialize, Serialize};

use crate::error::StudioResult;
use crate::media::ScriptedMedia;

/// Element a command is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Target {
    /// A specific element id.
    Id(ElementId),
    /// A named reference resolved at replay time.
    Named(NamedTarget),
}

/// Targets resolved against the runner's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamedTarget {
    /// The most recently added element.
    Last,
    /// The currently selected element.
    Selected,
}

/// Phase of a scripted gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// Gesture starts.
    Begin,
    /// Gesture moves.
    Update,
    /// Gesture completes and commits.
    End,
    /// Gesture is aborted.
    Cancel,
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Toolbar: Add Text.
    AddText,
    /// Toolbar: Add Rectangle.
    AddRectangle,
    /// Toolbar: Add Circle.
    AddCircle,
    /// Toolbar: Add Image. A missing source means the picker was canceled.
    AddImage {
        /// Source the picker returns.
        #[serde(default)]
        source: Option<String>,
        /// Answer to the media permission prompt.
        #[serde(default = "granted")]
        permission: Permission,
    },
    /// Tap an element.
    Tap {
        /// Tapped element.
        target: Target,
    },
    /// Tap at a canvas point.
    TapAt {
        /// X coordinate.
        x: f32,
        /// Y coordinate.
        y: f32,
    },
    /// Replace the text input's content.
    Edit {
        /// Full text of the input.
        text: String,
    },
    /// Dismiss the text input.
    Blur,
    /// One phase of a pan gesture.
    Pan {
        /// Dragged element.
        target: Target,
        /// Gesture phase.
        phase: GesturePhase,
        /// Cumulative horizontal translation (updates only).
        #[serde(default)]
        dx: f32,
        /// Cumulative vertical translation (updates only).
        #[serde(default)]
        dy: f32,
    },
    /// One phase of a pinch gesture.
    Pinch {
        /// Pinched element.
        target: Target,
        /// Gesture phase.
        phase: GesturePhase,
        /// Cumulative scale factor (updates only).
        #[serde(default = "unit_scale")]
        scale: f32,
    },
    /// Toolbar: Remove.
    RemoveSelected,
    /// Toolbar: Export.
    Export,
}

fn granted() -> Permission {
    Permission::Granted
}

fn unit_scale() -> f32 {
    1.0
}

/// Parse a script from JSON text.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of commands.
pub fn parse_script(json: &str) -> StudioResult<Vec<Command>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_script(path: &Path) -> StudioResult<Vec<Command>> {
    let json = tokio::fs::read_to_string(path).await?;
    let commands = parse_script(&json)?;
    tracing::debug!("Loaded {} commands from {}", commands.len(), path.display());
    Ok(commands)
}

/// Applies script commands to a canvas and collects the notices shown.
pub struct ScriptRunner<C, P> {
    store: CanvasStore,
    pipeline: ExportPipeline<C, P>,
    last_added: Option<ElementId>,
    notices: Vec<Notice>,
}

impl<C: Capture, P: Persistence> ScriptRunner<C, P> {
    /// Create a runner over `store`.
    #[must_use]
    pub fn new(store: CanvasStore, pipeline: ExportPipeline<C, P>) -> Self {
        Self {
            store,
            pipeline,
            last_added: None,
            notices: Vec::new(),
        }
    }

    /// The canvas being edited.
    #[must_use]
    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    /// Notices raised so far, oldest first.
    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Apply every command in order.
    pub async fn run(&mut self, commands: &[Command]) {
        for command in commands {
            self.apply(command).await;
        }
        tracing::info!(
            "Replayed {} commands, {} elements on canvas",
            commands.len(),
            self.store.read(|canvas| canvas.registry().len())
        );
    }

    /// Apply one command. Returns whether it had any effect.
    pub async fn apply(&mut self, command: &Command) -> bool {
        tracing::debug!("Applying {command:?}");
        match command {
            Command::AddText => {
                self.last_added = Some(self.store.add_text());
                true
            }
            Command::AddRectangle => self.add(ElementKind::Rectangle),
            Command::AddCircle => self.add(ElementKind::Circle),
            Command::AddImage { source, permission } => {
                let media = ScriptedMedia::new(*permission, source.clone());
                match self.store.add_image_from(&media).await {
                    Ok(Some(id)) => {
                        self.last_added = Some(id);
                        true
                    }
                    Ok(None) => false,
                    Err(e) => {
                        self.notify(Notice::from(&e));
                        false
                    }
                }
            }
            Command::Tap { target } => self.send(*target, |target| InputEvent::Tap { target }),
            Command::TapAt { x, y } => self.store.process_event(&InputEvent::TapAt { x: *x, y: *y }),
            Command::Edit { text } => self
                .store
                .process_event(&InputEvent::TextInput { text: text.clone() }),
            Command::Blur => self.store.process_event(&InputEvent::Blur),
            Command::Pan {
                target,
                phase,
                dx,
                dy,
            } => {
                let phase = match phase {
                    GesturePhase::Begin => PanPhase::Begin,
                    GesturePhase::Update => PanPhase::Update {
                        translation_x: *dx,
                        translation_y: *dy,
                    },
                    GesturePhase::End => PanPhase::End,
                    GesturePhase::Cancel => PanPhase::Cancel,
                };
                self.send(*target, |target| InputEvent::Pan { target, phase })
            }
            Command::Pinch {
                target,
                phase,
                scale,
            } => {
                let phase = match phase {
                    GesturePhase::Begin => PinchPhase::Begin,
                    GesturePhase::Update => PinchPhase::Update { scale: *scale },
                    GesturePhase::End => PinchPhase::End,
                    GesturePhase::Cancel => PinchPhase::Cancel,
                };
                self.send(*target, |target| InputEvent::Pinch { target, phase })
            }
            Command::RemoveSelected => self.store.remove_selected().is_some(),
            Command::Export => {
                let notice = self.pipeline.export_and_notify(&self.store).await;
                let saved = notice == Notice::saved();
                self.notify(notice);
                saved
            }
        }
    }

    fn add(&mut self, kind: ElementKind) -> bool {
        self.last_added = Some(self.store.add(kind));
        true
    }

    fn send(&self, target: Target, event: impl FnOnce(ElementId) -> InputEvent) -> bool {
        match self.resolve(target) {
            Some(id) => self.store.process_event(&event(id)),
            None => {
                tracing::debug!("Command target {target:?} resolves to nothing");
                false
            }
        }
    }

    fn resolve(&self, target: Target) -> Option<ElementId> {
        match target {
            Target::Id(id) => Some(id),
            Target::Named(NamedTarget::Last) => self.last_added,
            Target::Named(NamedTarget::Selected) => self.store.selected(),
        }
    }

    fn notify(&mut self, notice: Notice) {
        tracing::info!("{notice}");
        self.notices.push(notice);
    }
}
