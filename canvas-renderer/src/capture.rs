//! Scene capture.
//!
//! Rasterizes a [`SceneSnapshot`] to a PNG artifact using an SVG
//! intermediate and the resvg/tiny-skia pipeline.

use std::sync::Arc;

use canvas_core::SceneSnapshot;
use usvg::fontdb;

use crate::compose::compose_svg;
use crate::error::{RenderError, RenderResult};

/// Configuration for scene capture.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output width in pixels (default: scene viewport width).
    pub width: Option<u32>,
    /// Output height in pixels (default: scene viewport height).
    pub height: Option<u32>,
    /// Background color as RGBA bytes.
    pub background: [u8; 4],
    /// Scale factor (e.g. 2.0 for retina).
    pub scale: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            background: [255, 255, 255, 255],
            scale: 1.0,
        }
    }
}

/// An encoded raster image of the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    /// PNG-encoded bytes.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Produces a raster image of the visible canvas.
pub trait Capture: Send + Sync {
    /// Capture a frame.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Capture`] if the frame cannot be produced.
    fn capture(&self, scene: &SceneSnapshot) -> RenderResult<ImageArtifact>;
}

/// Families tried, in order, for generic `sans-serif` text.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// Software rasterizer for scene snapshots.
#[derive(Debug, Clone)]
pub struct RasterCapture {
    config: ExportConfig,
    fonts: Arc<fontdb::Database>,
}

impl Default for RasterCapture {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl RasterCapture {
    /// Create a capture with the given configuration.
    ///
    /// System fonts are loaded once here and shared by every capture.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self {
            config,
            fonts: Arc::new(load_fonts()),
        }
    }

    /// Number of font faces available to text elements.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Compose the scene to an SVG string at the output size.
    #[must_use]
    pub fn render_to_svg(&self, scene: &SceneSnapshot) -> String {
        let (out_w, out_h) = self.output_dimensions(scene);
        compose_svg(scene, out_w, out_h, self.config.background)
    }

    /// Render the scene to PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterizing or encoding fails.
    pub fn render_to_png(&self, scene: &SceneSnapshot) -> RenderResult<ImageArtifact> {
        let svg = self.render_to_svg(scene);
        let pixmap = self.rasterize_svg(&svg)?;
        let bytes = pixmap
            .encode_png()
            .map_err(|e| RenderError::Capture(format!("PNG encoding failed: {e}")))?;

        tracing::debug!(
            "Captured {} elements at {}x{}",
            scene.elements.len(),
            pixmap.width(),
            pixmap.height()
        );

        Ok(ImageArtifact {
            bytes,
            width: pixmap.width(),
            height: pixmap.height(),
        })
    }

    /// Output dimensions (width, height) in pixels.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn output_dimensions(&self, scene: &SceneSnapshot) -> (u32, u32) {
        let base_w = self
            .config
            .width
            .unwrap_or_else(|| scene.width.max(1.0) as u32);
        let base_h = self
            .config
            .height
            .unwrap_or_else(|| scene.height.max(1.0) as u32);

        #[allow(clippy::cast_precision_loss)]
        let out_w = (base_w as f32 * self.config.scale) as u32;
        #[allow(clippy::cast_precision_loss)]
        let out_h = (base_h as f32 * self.config.scale) as u32;
        (out_w.max(1), out_h.max(1))
    }

    /// Rasterize an SVG string to a tiny-skia Pixmap.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn rasterize_svg(&self, svg: &str) -> RenderResult<tiny_skia::Pixmap> {
        let opt = usvg::Options {
            fontdb: Arc::clone(&self.fonts),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &opt)
            .map_err(|e| RenderError::Capture(format!("SVG parsing failed: {e}")))?;

        let px_w = tree.size().width() as u32;
        let px_h = tree.size().height() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
            .ok_or_else(|| RenderError::Capture("Failed to create pixmap".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

/// Load system fonts and point the generic families at an installed face.
fn load_fonts() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();

    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    let family = SANS_SERIF_FAMILIES
        .iter()
        .find(|name| installed(**name))
        .map(|name| (*name).to_string())
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        });

    match family {
        Some(family) => {
            tracing::debug!("Loaded {} font faces, sans-serif is {family}", db.len());
            db.set_sans_serif_family(family.clone());
            db.set_serif_family(family);
        }
        None => tracing::warn!("No system fonts found, text elements will render without labels"),
    }
    db
}

impl Capture for RasterCapture {
    fn capture(&self, scene: &SceneSnapshot) -> RenderResult<ImageArtifact> {
        self.render_to_png(scene)
    }
}
