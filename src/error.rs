//! Error types for bindery.

use std::io;
use thiserror::Error;

use crate::layout::Page;

/// Result type alias for bindery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating, estimating or laying out a book.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading documents or image files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Document or page JSON could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A document-wide setting is outside its documented range.
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// A section carries a value outside its documented range.
    #[error("Invalid section '{section}': {reason}")]
    InvalidSection {
        /// Section id
        section: String,
        /// What is wrong with it
        reason: String,
    },

    /// Intrinsic image size could not be determined.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Layout was cancelled cooperatively.
    ///
    /// Carries every page that was completed before the token fired.
    #[error("Layout cancelled after {} completed pages", pages.len())]
    Cancelled {
        /// Pages finished before cancellation
        pages: Vec<Page>,
    },

    /// Error while serializing laid-out pages.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidSection`].
    pub(crate) fn section(section: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidSection {
            section: section.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled { .. })
    }

    /// Take the partial pages out of a cancellation error.
    pub fn into_partial_pages(self) -> Option<Vec<Page>> {
        match self {
            Error::Cancelled { pages } => Some(pages),
            _ => None,
        }
    }
}

/// Failure to read an image's intrinsic size.
///
/// Fatal only when returned directly by a measurer; the flow engine records it
/// as a warning and keeps going without the image.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[error("Image '{image_id}' could not be measured: {reason}")]
pub struct ImageError {
    /// Id of the image (or the cover slot name)
    pub image_id: String,
    /// Human-readable cause
    pub reason: String,
}

impl ImageError {
    /// Create a new image error.
    pub fn new(image_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidSettings("margin top is negative".to_string());
        assert_eq!(err.to_string(), "Invalid settings: margin top is negative");

        let err = Error::section("ch-1", "line spacing below 1");
        assert_eq!(
            err.to_string(),
            "Invalid section 'ch-1': line spacing below 1"
        );
    }

    #[test]
    fn test_cancelled_carries_pages() {
        let err = Error::Cancelled {
            pages: vec![Page::new(0), Page::new(1)],
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Layout cancelled after 2 completed pages");
        assert_eq!(err.into_partial_pages().map(|p| p.len()), Some(2));
    }

    #[test]
    fn test_image_error_conversion() {
        let err: Error = ImageError::new("fig-1", "corrupt header").into();
        assert!(matches!(err, Error::Image(_)));
        assert_eq!(
            err.to_string(),
            "Image 'fig-1' could not be measured: corrupt header"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
