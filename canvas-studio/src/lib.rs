//! # Design Canvas Studio
//!
//! Headless host for the design canvas. Replays a JSON script of toolbar
//! commands and touch gestures against the editor and exports the result as
//! PNG into an album directory.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p design-canvas-studio -- --script demo.json --out-dir ./exports
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `StudioConfig` - Viewport, export and album settings
//! - `ScriptRunner` - Applies [`Command`]s to a shared `CanvasStore`
//! - `ScriptedMedia` - Media source answering from the script itself

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
mod media;
mod script;

pub use error::{StudioError, StudioResult};
pub use media::ScriptedMedia;
pub use script::{
    load_script, parse_script, Command, GesturePhase, NamedTarget, ScriptRunner, Target,
};

use std::path::PathBuf;

use canvas_core::{CanvasConfig, Permission};
use canvas_renderer::{ExportConfig, DEFAULT_ALBUM};
use clap::Parser;

/// Command-line arguments for design-canvas-studio.
#[derive(Debug, Clone, Parser)]
#[command(name = "design-canvas-studio")]
#[command(about = "Replay a design canvas script and export the result")]
#[command(version)]
pub struct CliArgs {
    /// JSON script of commands to replay
    #[arg(long, env = "DESIGN_CANVAS_SCRIPT")]
    pub script: Option<PathBuf>,

    /// Directory holding export albums
    #[arg(long, env = "DESIGN_CANVAS_OUT_DIR", default_value = "./exports")]
    pub out_dir: PathBuf,

    /// Album exports are saved into
    #[arg(long, default_value = DEFAULT_ALBUM)]
    pub album: String,

    /// Canvas width in pixels
    #[arg(long, default_value = "390")]
    pub width: u32,

    /// Canvas height in pixels
    #[arg(long, default_value = "640")]
    pub height: u32,

    /// Refuse gallery write access
    #[arg(long)]
    pub deny_gallery: bool,

    /// Print the final registry as JSON
    #[arg(long)]
    pub dump_registry: bool,
}

/// Studio configuration.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Script to replay, if any.
    pub script: Option<PathBuf>,
    /// Directory holding export albums.
    pub out_dir: PathBuf,
    /// Album exports are saved into.
    pub album: String,
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Answer given to gallery permission requests.
    pub gallery_permission: Permission,
    /// Print the final registry as JSON.
    pub dump_registry: bool,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl StudioConfig {
    /// Create a studio configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: None,
            out_dir: PathBuf::from("./exports"),
            album: DEFAULT_ALBUM.to_string(),
            width: 390,
            height: 640,
            gallery_permission: Permission::Granted,
            dump_registry: false,
        }
    }

    /// Editor configuration for the viewport.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn canvas_config(&self) -> CanvasConfig {
        CanvasConfig {
            width: self.width as f32,
            height: self.height as f32,
            ..CanvasConfig::default()
        }
    }

    /// Capture configuration. Exports match the viewport.
    #[must_use]
    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            width: Some(self.width),
            height: Some(self.height),
            ..ExportConfig::default()
        }
    }
}

impl From<CliArgs> for StudioConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            script: args.script,
            out_dir: args.out_dir,
            album: args.album,
            width: args.width,
            height: args.height,
            gallery_permission: if args.deny_gallery {
                Permission::Denied
            } else {
                Permission::Granted
            },
            dump_registry: args.dump_registry,
        }
    }
}
