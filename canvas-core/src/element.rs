//! Canvas elements - the placeable building blocks of a design.

use serde::{Deserialize, Serialize};

/// Smallest scale an element may take. Pinch input is clamped to this floor.
pub const MIN_SCALE: f32 = 0.05;

/// Default label given to newly added text elements.
pub const DEFAULT_TEXT_LABEL: &str = "New Text";

/// Font size used for text labels, in pixels.
pub const TEXT_FONT_SIZE: f32 = 16.0;

/// Padding between a text label and its frame, in pixels.
pub const TEXT_PADDING: f32 = 4.0;

/// Side length of rectangle and circle elements, in pixels.
pub const SHAPE_SIZE: f32 = 100.0;

/// Side length of the frame an image is fitted into, in pixels.
pub const IMAGE_SIZE: f32 = 120.0;

/// Average glyph advance relative to the font size, used to size text frames.
const GLYPH_ADVANCE: f32 = 0.6;

/// Unique identifier for an element.
///
/// Identifiers are allocated from a monotonic counter owned by the
/// [`Registry`](crate::Registry) and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw identifier value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw identifier value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of an element, without its payload.
///
/// The declaration order is the paint order across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KindTag {
    /// Text label.
    Text,
    /// Rectangle outline.
    Rectangle,
    /// Circle outline.
    Circle,
    /// Picked image.
    Image,
}

impl std::fmt::Display for KindTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Rectangle => "rectangle",
            Self::Circle => "circle",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// The content an element carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ElementKind {
    /// An editable text label.
    Text {
        /// Text content.
        label: String,
    },

    /// A square outline.
    Rectangle,

    /// A round outline.
    Circle,

    /// An image picked from a media source.
    Image {
        /// Opaque source reference (file path, `file://` or `data:` URI).
        source: String,
    },
}

impl ElementKind {
    /// A text element with the default label.
    #[must_use]
    pub fn text() -> Self {
        Self::Text {
            label: DEFAULT_TEXT_LABEL.to_string(),
        }
    }

    /// An image element for the given source reference.
    #[must_use]
    pub fn image(source: impl Into<String>) -> Self {
        Self::Image {
            source: source.into(),
        }
    }

    /// The payload-free tag of this kind.
    #[must_use]
    pub const fn tag(&self) -> KindTag {
        match self {
            Self::Text { .. } => KindTag::Text,
            Self::Rectangle => KindTag::Rectangle,
            Self::Circle => KindTag::Circle,
            Self::Image { .. } => KindTag::Image,
        }
    }

    /// Whether pinch gestures may change this kind's scale.
    #[must_use]
    pub const fn is_scalable(&self) -> bool {
        !matches!(self, Self::Text { .. })
    }
}

/// Position and scale of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Horizontal offset from the canvas origin, in pixels.
    pub x: f32,
    /// Vertical offset from the canvas origin, in pixels.
    pub y: f32,
    /// Scale factor applied about the element's centre. Always positive.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// Create a transform, clamping `scale` to [`MIN_SCALE`].
    #[must_use]
    pub fn new(x: f32, y: f32, scale: f32) -> Self {
        Self {
            x,
            y,
            scale: clamp_scale(scale),
        }
    }
}

/// Clamp a scale factor to the strictly positive floor.
///
/// NaN maps to the floor so a bad pinch factor can never poison the registry.
#[must_use]
pub fn clamp_scale(scale: f32) -> f32 {
    if scale.is_nan() {
        MIN_SCALE
    } else {
        scale.clamp(MIN_SCALE, f32::MAX)
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element content.
    pub kind: ElementKind,
    /// Committed position and scale.
    pub transform: Transform,
}

impl Element {
    /// Create an element at the origin with unit scale.
    #[must_use]
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            kind,
            transform: Transform::default(),
        }
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// The payload-free kind tag.
    #[must_use]
    pub const fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    /// The text label, if this is a text element.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { label } => Some(label),
            _ => None,
        }
    }

    /// Unscaled width and height of the element's frame.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn footprint(&self) -> (f32, f32) {
        match &self.kind {
            ElementKind::Text { label } => {
                let glyphs = label.chars().count().max(1) as f32;
                (
                    glyphs * TEXT_FONT_SIZE * GLYPH_ADVANCE + TEXT_PADDING * 2.0,
                    TEXT_FONT_SIZE * 1.25 + TEXT_PADDING * 2.0,
                )
            }
            ElementKind::Rectangle | ElementKind::Circle => (SHAPE_SIZE, SHAPE_SIZE),
            ElementKind::Image { .. } => (IMAGE_SIZE, IMAGE_SIZE),
        }
    }

    /// Screen-space bounds `(left, top, right, bottom)` after scaling about the centre.
    #[must_use]
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let (w, h) = self.footprint();
        let t = &self.transform;
        let cx = t.x + w / 2.0;
        let cy = t.y + h / 2.0;
        let half_w = w * t.scale / 2.0;
        let half_h = h * t.scale / 2.0;
        (cx - half_w, cy - half_h, cx + half_w, cy + half_h)
    }

    /// Check if a point (in canvas coordinates) is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let (left, top, right, bottom) = self.bounds();
        x >= left && x <= right && y >= top && y <= bottom
    }
}
