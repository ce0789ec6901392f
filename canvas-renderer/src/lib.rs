//! # Design Canvas Renderer
//!
//! Software composition and export for the design canvas.
//!
//! ## Export Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ CanvasStore  │──▶│  compose     │──▶│  capture     │──▶│  persist     │
//! │ (snapshot)   │   │  (SVG)       │   │  (resvg PNG) │   │  (album)     │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! Both ends of the pipeline are traits ([`Capture`], [`Persistence`]) so a
//! host can plug in a platform screenshot or photo library.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capture;
pub mod compose;
pub mod error;
pub mod export;
pub mod image;
pub mod persist;

pub use capture::{Capture, ExportConfig, ImageArtifact, RasterCapture};
pub use compose::compose_svg;
pub use error::{RenderError, RenderResult};
pub use export::{ExportPipeline, DEFAULT_ALBUM};
pub use persist::{AlbumDirectory, Persistence, SavedAsset};
