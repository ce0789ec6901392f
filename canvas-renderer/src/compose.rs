//! Scene composition.
//!
//! Turns a [`SceneSnapshot`] into an SVG document: background first, then one
//! group per element in the snapshot's paint order. Each group is translated
//! to the element's position and scaled about the centre of its footprint.

use std::fmt::Write;

use canvas_core::element::{IMAGE_SIZE, TEXT_FONT_SIZE, TEXT_PADDING};
use canvas_core::{Element, ElementKind, SceneSnapshot};

use crate::image::{resize_to_fit, resolve_source, to_png_data_uri};

/// Embedded images are downscaled to this many pixels per side at most.
const MAX_EMBEDDED_SIDE: u32 = 1024;

/// Shape outline width, in pixels.
const SHAPE_STROKE: f32 = 2.0;

/// Compose a scene into an SVG document.
///
/// `out_w`/`out_h` are the pixel dimensions of the output; the view box always
/// covers the scene viewport so the output scales as a whole.
#[must_use]
pub fn compose_svg(scene: &SceneSnapshot, out_w: u32, out_h: u32, background: [u8; 4]) -> String {
    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {} {}\">",
        scene.width, scene.height,
    );

    let bg_alpha = f32::from(background[3]) / 255.0;
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"rgb({},{},{})\" fill-opacity=\"{bg_alpha}\"/>",
        background[0], background[1], background[2],
    );

    for element in &scene.elements {
        render_element_svg(&mut svg, element);
    }

    svg.push_str("</svg>");
    svg
}

/// Render a single element to SVG.
fn render_element_svg(svg: &mut String, element: &Element) {
    let (w, h) = element.footprint();
    let tf = &element.transform;
    // Scale about the footprint centre, then move to the element's position.
    let tx = tf.x + w / 2.0 * (1.0 - tf.scale);
    let ty = tf.y + h / 2.0 * (1.0 - tf.scale);
    let _ = write!(
        svg,
        "<g transform=\"translate({tx},{ty}) scale({})\">",
        tf.scale
    );

    match &element.kind {
        ElementKind::Text { label } => {
            let escaped = escape_xml(label);
            let _ = write!(
                svg,
                "<rect x=\"0.5\" y=\"0.5\" width=\"{}\" height=\"{}\" fill=\"#ffffff\" fill-opacity=\"0.8\" stroke=\"#000\" stroke-width=\"1\"/>",
                w - 1.0,
                h - 1.0,
            );
            let baseline = TEXT_PADDING + TEXT_FONT_SIZE;
            let _ = write!(
                svg,
                "<text x=\"{TEXT_PADDING}\" y=\"{baseline}\" font-size=\"{TEXT_FONT_SIZE}\" fill=\"#000\" font-family=\"sans-serif\">{escaped}</text>",
            );
        }

        ElementKind::Rectangle => {
            let inset = SHAPE_STROKE / 2.0;
            let _ = write!(
                svg,
                "<rect x=\"{inset}\" y=\"{inset}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"#000\" stroke-width=\"{SHAPE_STROKE}\"/>",
                w - SHAPE_STROKE,
                h - SHAPE_STROKE,
            );
        }

        ElementKind::Circle => {
            let radius = (w - SHAPE_STROKE) / 2.0;
            let _ = write!(
                svg,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{radius}\" fill=\"none\" stroke=\"#000\" stroke-width=\"{SHAPE_STROKE}\"/>",
                w / 2.0,
                h / 2.0,
            );
        }

        ElementKind::Image { source } => match embed_image(source) {
            Some(href) => {
                let _ = write!(
                    svg,
                    "<image x=\"0\" y=\"0\" width=\"{IMAGE_SIZE}\" height=\"{IMAGE_SIZE}\" preserveAspectRatio=\"xMidYMid meet\" href=\"{href}\"/>",
                );
            }
            None => {
                let _ = write!(
                    svg,
                    "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"#e0e0e0\" stroke=\"#999\" stroke-width=\"1\"/>",
                );
                let _ = write!(
                    svg,
                    "<text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"#666\" text-anchor=\"middle\" font-family=\"sans-serif\">Image</text>",
                    w / 2.0,
                    h / 2.0,
                );
            }
        },
    }

    svg.push_str("</g>");
}

/// Resolve an image source to an embeddable PNG data URI.
///
/// Unresolvable sources yield `None` and are painted as a placeholder.
fn embed_image(source: &str) -> Option<String> {
    let texture = match resolve_source(source) {
        Ok(texture) => texture,
        Err(e) => {
            tracing::warn!("Image source unavailable, drawing placeholder: {e}");
            return None;
        }
    };
    let texture = resize_to_fit(&texture, MAX_EMBEDDED_SIDE, MAX_EMBEDDED_SIDE).unwrap_or(texture);
    match to_png_data_uri(&texture) {
        Ok(uri) => Some(uri),
        Err(e) => {
            tracing::warn!("Image could not be embedded: {e}");
            None
        }
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::{ElementId, Transform};

    fn element(raw: u64, kind: ElementKind, transform: Transform) -> Element {
        Element::new(ElementId::from_raw(raw), kind).with_transform(transform)
    }

    fn scene(elements: Vec<Element>) -> SceneSnapshot {
        SceneSnapshot {
            width: 200.0,
            height: 100.0,
            elements,
        }
    }

    #[test]
    fn test_empty_scene() {
        let svg = compose_svg(&scene(vec![]), 200, 100, [255, 255, 255, 255]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("viewBox=\"0 0 200 100\""));
    }

    #[test]
    fn test_shapes_scale_about_centre() {
        let rect = element(1, ElementKind::Rectangle, Transform::new(10.0, 20.0, 2.0));
        let svg = compose_svg(&scene(vec![rect]), 200, 100, [255; 4]);
        // 100px footprint scaled 2x about (60, 70) starts at (-40, -30)
        assert!(svg.contains("translate(-40,-30) scale(2)"));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn test_circle_radius() {
        let circle = element(1, ElementKind::Circle, Transform::default());
        let svg = compose_svg(&scene(vec![circle]), 200, 100, [255; 4]);
        assert!(svg.contains("<circle cx=\"50\" cy=\"50\" r=\"49\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let text = element(
            1,
            ElementKind::Text {
                label: "A < B & C".to_string(),
            },
            Transform::default(),
        );
        let svg = compose_svg(&scene(vec![text]), 200, 100, [255; 4]);
        assert!(svg.contains("A &lt; B &amp; C"));
    }

    #[test]
    fn test_paint_order_is_preserved() {
        let first = element(
            2,
            ElementKind::Text {
                label: "first".to_string(),
            },
            Transform::default(),
        );
        let second = element(1, ElementKind::Circle, Transform::default());
        let svg = compose_svg(&scene(vec![first, second]), 200, 100, [255; 4]);
        let text_at = svg.find("first").expect("text");
        let circle_at = svg.find("<circle").expect("circle");
        assert!(text_at < circle_at);
    }

    #[test]
    fn test_missing_image_draws_placeholder() {
        let image = element(
            1,
            ElementKind::image("/no/such/file.png"),
            Transform::default(),
        );
        let svg = compose_svg(&scene(vec![image]), 200, 100, [255; 4]);
        assert!(svg.contains("#e0e0e0"));
        assert!(svg.contains(">Image</text>"));
    }

    #[test]
    fn test_data_uri_image_is_embedded() {
        let src = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";
        let image = element(1, ElementKind::image(src), Transform::default());
        let svg = compose_svg(&scene(vec![image]), 200, 100, [255; 4]);
        assert!(svg.contains("<image"));
        assert!(svg.contains("href=\"data:image/png;base64,"));
        assert!(svg.contains("xMidYMid meet"));
    }
}
