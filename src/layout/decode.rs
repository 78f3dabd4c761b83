//! Intrinsic image sizes read with the `image` crate.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, ImageReader};

use super::measure::{ImageMeasurer, ImageSize};
use crate::detect::{classify_source, detect_image_kind, ImageKind, ImageSource};
use crate::error::ImageError;

/// Reads image headers from `data:` URIs and local files.
///
/// Only the header is decoded, not the pixels. Remote URLs are reported as
/// errors; resolve them into an [`ImageSizes`](super::ImageSizes) table first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingMeasurer;

impl DecodingMeasurer {
    /// Create a measurer.
    pub fn new() -> Self {
        Self
    }
}

impl ImageMeasurer for DecodingMeasurer {
    fn measure(&self, src: &str) -> Result<ImageSize, ImageError> {
        let bytes = source_bytes(src)?;
        size_from_bytes(src, &bytes)
    }
}

/// Raw bytes behind an image reference.
pub(crate) fn source_bytes(src: &str) -> Result<Vec<u8>, ImageError> {
    match classify_source(src) {
        Some(ImageSource::DataUri {
            base64: true,
            payload,
            ..
        }) => BASE64
            .decode(payload.trim())
            .map_err(|e| ImageError::new(src, format!("invalid base64: {}", e))),
        Some(ImageSource::DataUri { payload, .. }) => Ok(payload.as_bytes().to_vec()),
        Some(ImageSource::File(path)) => {
            std::fs::read(&path).map_err(|e| ImageError::new(src, e.to_string()))
        }
        Some(ImageSource::Remote(_)) => Err(ImageError::new(src, "remote images are not fetched")),
        None => Err(ImageError::new(src, "malformed data URI")),
    }
}

fn image_format(kind: ImageKind) -> ImageFormat {
    match kind {
        ImageKind::Png => ImageFormat::Png,
        ImageKind::Jpeg => ImageFormat::Jpeg,
        ImageKind::Gif => ImageFormat::Gif,
        ImageKind::WebP => ImageFormat::WebP,
    }
}

/// Read dimensions from an encoded image header.
///
/// The format is sniffed from magic bytes first; anything that is not PNG,
/// JPEG, GIF or WebP is rejected without invoking a decoder.
pub(crate) fn size_from_bytes(src: &str, bytes: &[u8]) -> Result<ImageSize, ImageError> {
    let kind = detect_image_kind(bytes)
        .ok_or_else(|| ImageError::new(src, "not a PNG, JPEG, GIF or WebP image"))?;
    let (width, height) = ImageReader::with_format(Cursor::new(bytes), image_format(kind))
        .into_dimensions()
        .map_err(|e| ImageError::new(src, e.to_string()))?;
    Ok(ImageSize::new(width, height))
}
