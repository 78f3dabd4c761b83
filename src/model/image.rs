//! Inline images attached to sections.

use serde::{Deserialize, Serialize};

/// An image placed after a section's (or subsection's) text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Stable id assigned by the editor
    pub id: String,

    /// URL, file path or `data:` URI of the image
    #[serde(alias = "url")]
    pub src: String,

    /// Caption drawn under the image (empty = none)
    #[serde(default)]
    pub caption: String,

    /// Horizontal placement inside the content box
    #[serde(default)]
    pub alignment: ImageAlignment,

    /// Width as a percentage of the content width (10-100)
    #[serde(alias = "width")]
    pub width_percent: u8,
}

impl Image {
    /// Create a centered, full-width image.
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            caption: String::new(),
            alignment: ImageAlignment::Center,
            width_percent: 100,
        }
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    /// Set the alignment.
    pub fn with_alignment(mut self, alignment: ImageAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the width percentage.
    pub fn with_width_percent(mut self, percent: u8) -> Self {
        self.width_percent = percent;
        self
    }

    /// Check if the image has a caption.
    pub fn has_caption(&self) -> bool {
        !self.caption.is_empty()
    }

    /// Check the width percentage against the accepted range.
    pub fn width_in_range(&self) -> bool {
        (10..=100).contains(&self.width_percent)
    }
}

/// Horizontal image alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageAlignment {
    /// Flush with the left margin
    Left,
    /// Centered on the page
    #[default]
    Center,
    /// Flush with the right margin
    Right,
}
