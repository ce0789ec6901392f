//! Image source resolution.
//!
//! Image elements carry an opaque source reference. For composition it is
//! resolved to pixels (from a `data:` URI, a `file://` URI or a plain path),
//! downscaled if oversized, and re-encoded as a PNG data URI that the SVG
//! rasterizer can consume without filesystem access.

use std::path::Path;

use base64::Engine;
use image::ImageEncoder;

use crate::error::{RenderError, RenderResult};

/// Decoded image data.
#[derive(Debug, Clone)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub data: Vec<u8>,
    /// Original format of the image.
    pub format: ImageFormat,
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// PNG with alpha support.
    Png,
    /// JPEG (no alpha).
    Jpeg,
    /// WebP (alpha support).
    WebP,
    /// Unknown/other format.
    Unknown,
}

impl ImageFormat {
    /// Detect format from magic bytes.
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Self::WebP;
        }

        Self::Unknown
    }
}

/// Load an image from raw bytes.
///
/// # Errors
///
/// Returns an error if the image cannot be decoded.
pub fn load_image_from_bytes(data: &[u8]) -> RenderResult<TextureData> {
    let format = ImageFormat::from_magic_bytes(data);

    let img = image::load_from_memory(data)
        .map_err(|e| RenderError::Resource(format!("Failed to decode image: {e}")))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    Ok(TextureData {
        width,
        height,
        data: rgba.into_raw(),
        format,
    })
}

/// Load an image from a data URI.
///
/// Supports forms like `data:image/png;base64,iVBORw0KGgo...`.
///
/// # Errors
///
/// Returns an error if the data URI is malformed or the image cannot be decoded.
pub fn load_image_from_data_uri(uri: &str) -> RenderResult<TextureData> {
    let uri_data = uri
        .strip_prefix("data:")
        .ok_or_else(|| RenderError::Resource("Not a data URI".to_string()))?;

    let (metadata, encoded_data) = uri_data
        .split_once(',')
        .ok_or_else(|| RenderError::Resource("Invalid data URI: missing comma".to_string()))?;

    let bytes = if metadata.contains(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(encoded_data)
            .map_err(|e| RenderError::Resource(format!("Failed to decode base64: {e}")))?
    } else {
        percent_decode(encoded_data)?
    };

    load_image_from_bytes(&bytes)
}

/// Resolve an image element's source reference to pixels.
///
/// # Errors
///
/// Returns an error if the source cannot be read or decoded.
pub fn resolve_source(source: &str) -> RenderResult<TextureData> {
    if source.starts_with("data:") {
        return load_image_from_data_uri(source);
    }
    let path = match source.strip_prefix("file://") {
        Some(rest) => String::from_utf8(percent_decode(rest)?)
            .map_err(|e| RenderError::Resource(format!("Invalid file URI: {e}")))?,
        None => source.to_string(),
    };
    let bytes = std::fs::read(Path::new(&path))
        .map_err(|e| RenderError::Resource(format!("Failed to read {path}: {e}")))?;
    load_image_from_bytes(&bytes)
}

/// Percent-decoding for URI payloads.
fn percent_decode(input: &str) -> RenderResult<Vec<u8>> {
    let bytes = input.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let byte = input
                .get(i + 1..i + 3)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| RenderError::Resource("Invalid URL encoding".to_string()))?;
            result.push(byte);
            i += 3;
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    Ok(result)
}

/// Resize an image to fit within max dimensions while preserving aspect ratio.
///
/// Returns `None` if the image is already smaller than the max dimensions.
#[must_use]
pub fn resize_to_fit(texture: &TextureData, max_width: u32, max_height: u32) -> Option<TextureData> {
    if texture.width <= max_width && texture.height <= max_height {
        return None;
    }

    let scale_x = f64::from(max_width) / f64::from(texture.width);
    let scale_y = f64::from(max_height) / f64::from(texture.height);
    let scale = scale_x.min(scale_y);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_width = ((f64::from(texture.width) * scale) as u32).max(1);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_height = ((f64::from(texture.height) * scale) as u32).max(1);

    let img = image::RgbaImage::from_raw(texture.width, texture.height, texture.data.clone())?;

    let resized = image::imageops::resize(
        &img,
        new_width,
        new_height,
        image::imageops::FilterType::Lanczos3,
    );

    Some(TextureData {
        width: new_width,
        height: new_height,
        data: resized.into_raw(),
        format: texture.format,
    })
}

/// Encode RGBA pixels as a `data:image/png;base64,...` URI.
///
/// # Errors
///
/// Returns an error if PNG encoding fails.
pub fn to_png_data_uri(texture: &TextureData) -> RenderResult<String> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            &texture.data,
            texture.width,
            texture.height,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| RenderError::Resource(format!("PNG encoding failed: {e}")))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{encoded}"))
}
