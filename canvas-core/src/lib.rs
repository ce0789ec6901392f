//! # Design Canvas Core
//!
//! Element model and gesture transform engine for a touch-driven design canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CanvasStore                  │
//! │        (Arc<RwLock<Canvas>>, one writer)    │
//! ├─────────────────────────────────────────────┤
//! │  Canvas                                     │
//! │  ├─ Registry           authoritative state  │
//! │  ├─ GestureController  live pan / pinch     │
//! │  └─ Selection          selected id + edit   │
//! ├─────────────────────────────────────────────┤
//! │  SceneSnapshot  →  canvas-renderer export   │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod element;
pub mod error;
pub mod event;
pub mod gesture;
pub mod media;
pub mod registry;
pub mod selection;
pub mod store;

pub use canvas::{Canvas, CanvasConfig, SceneSnapshot};
pub use element::{Element, ElementId, ElementKind, KindTag, Transform, MIN_SCALE};
pub use error::{CanvasError, CanvasResult, Notice};
pub use event::{InputEvent, PanPhase, PinchPhase};
pub use gesture::{Commit, GestureController, PanState, PinchState};
pub use media::{MediaAsset, MediaSource, Permission, PickResult};
pub use registry::Registry;
pub use selection::{Selection, TextEdit, TextMode};
pub use store::CanvasStore;

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
