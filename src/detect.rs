//! Image reference classification and format sniffing.

use std::path::PathBuf;

/// Where an image reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource<'a> {
    /// Inline `data:` URI
    DataUri {
        /// Declared MIME type (may be empty)
        mime: &'a str,
        /// Payload is base64 encoded
        base64: bool,
        /// Everything after the comma
        payload: &'a str,
    },
    /// `http://` or `https://` URL
    Remote(&'a str),
    /// Local file path (optionally `file://` prefixed)
    File(PathBuf),
}

impl std::fmt::Display for ImageSource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::DataUri { mime, .. } => write!(f, "data URI ({})", mime),
            ImageSource::Remote(url) => write!(f, "remote {}", url),
            ImageSource::File(path) => write!(f, "file {}", path.display()),
        }
    }
}

/// Classify an image reference.
///
/// A `data:` URI without a comma is malformed and returns `None`.
///
/// # Example
/// ```
/// use bindery::detect::{classify_source, ImageSource};
///
/// let source = classify_source("data:image/png;base64,iVBORw0KGgo=").unwrap();
/// assert!(matches!(source, ImageSource::DataUri { base64: true, .. }));
/// ```
pub fn classify_source(src: &str) -> Option<ImageSource<'_>> {
    if let Some(rest) = src.strip_prefix("data:") {
        let (header, payload) = rest.split_once(',')?;
        let base64 = header.ends_with(";base64");
        let mime = header.split(';').next().unwrap_or_default();
        return Some(ImageSource::DataUri {
            mime,
            base64,
            payload,
        });
    }
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(ImageSource::Remote(src));
    }
    let path = src.strip_prefix("file://").unwrap_or(src);
    Some(ImageSource::File(PathBuf::from(path)))
}

/// Raster formats the layout engine can size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    WebP,
}

impl ImageKind {
    /// MIME type of the format.
    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::WebP => "image/webp",
        }
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = b"\xff\xd8\xff";
const GIF_MAGIC: &[u8] = b"GIF8";

/// Detect the image format from its first bytes.
pub fn detect_image_kind(data: &[u8]) -> Option<ImageKind> {
    if data.starts_with(PNG_MAGIC) {
        Some(ImageKind::Png)
    } else if data.starts_with(JPEG_MAGIC) {
        Some(ImageKind::Jpeg)
    } else if data.starts_with(GIF_MAGIC) {
        Some(ImageKind::Gif)
    } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        Some(ImageKind::WebP)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_data_uri() {
        let source = classify_source("data:image/png;base64,AAAA").unwrap();
        assert_eq!(
            source,
            ImageSource::DataUri {
                mime: "image/png",
                base64: true,
                payload: "AAAA"
            }
        );
        assert!(classify_source("data:image/png;base64").is_none());
    }

    #[test]
    fn test_classify_remote_and_file() {
        assert_eq!(
            classify_source("https://example.com/a.png"),
            Some(ImageSource::Remote("https://example.com/a.png"))
        );
        assert_eq!(
            classify_source("file:///tmp/a.png"),
            Some(ImageSource::File(PathBuf::from("/tmp/a.png")))
        );
        assert_eq!(
            classify_source("images/a.png"),
            Some(ImageSource::File(PathBuf::from("images/a.png")))
        );
    }

    #[test]
    fn test_detect_image_kind() {
        assert_eq!(detect_image_kind(b"\x89PNG\r\n\x1a\n\0\0"), Some(ImageKind::Png));
        assert_eq!(detect_image_kind(b"\xff\xd8\xff\xe0"), Some(ImageKind::Jpeg));
        assert_eq!(detect_image_kind(b"GIF89a"), Some(ImageKind::Gif));
        assert_eq!(detect_image_kind(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageKind::WebP));
        assert_eq!(detect_image_kind(b"%PDF-1.7"), None);
        assert_eq!(ImageKind::Gif.mime_type(), "image/gif");
    }
}
