//! Measurement seams: text width and intrinsic image size.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ImageError;
use crate::model::{FontSpec, MM_PER_PT};

/// Measures rendered text width.
pub trait TextMeasurer: Send + Sync {
    /// Width of `text` in millimeters when set in `font` at `size_pt`.
    fn text_width_mm(&self, text: &str, font: &FontSpec, size_pt: f32) -> f32;
}

/// Glyph-class width model approximating the standard PDF faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn text_width_mm(&self, text: &str, font: &FontSpec, size_pt: f32) -> f32 {
        let family = font.family.to_ascii_lowercase();
        let monospace = family.contains("courier") || family.contains("mono");
        let em_sum: f32 = if monospace {
            text.chars().count() as f32 * 0.6
        } else {
            text.chars().map(glyph_em_width).sum()
        };
        let family_scale = if family.contains("times") || family.contains("serif") {
            0.95
        } else {
            1.0
        };
        em_sum * family_scale * size_pt * MM_PER_PT
    }
}

fn glyph_em_width(ch: char) -> f32 {
    match ch {
        ' ' => 0.278,
        'i' | 'j' | 'l' | '.' | ',' | ';' | ':' | '\'' | '|' | '!' => 0.24,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.333,
        'm' | 'w' => 0.833,
        'M' | 'W' => 0.9,
        '0'..='9' => 0.556,
        c if c.is_ascii_uppercase() => 0.667,
        c if c.is_ascii() => 0.54,
        // CJK and other wide scripts
        c if (c as u32) >= 0x2E80 => 1.0,
        _ => 0.6,
    }
}

/// Greedy word wrap of `text` to `max_width_mm`.
///
/// Explicit newlines are hard breaks. A word wider than the line is split
/// between characters. Empty input yields no lines.
pub fn wrap_text(
    text: &str,
    max_width_mm: f32,
    measurer: &dyn TextMeasurer,
    font: &FontSpec,
    size_pt: f32,
) -> Vec<String> {
    let mut lines = Vec::new();
    for hard_line in text.split('\n') {
        let mut current = String::new();
        for word in hard_line.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if measurer.text_width_mm(&candidate, font, size_pt) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if measurer.text_width_mm(word, font, size_pt) <= max_width_mm {
                current = word.to_string();
            } else {
                log::warn!("word wider than the content box, splitting: {}", word);
                let mut pieces = split_long_word(word, max_width_mm, measurer, font, size_pt);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

fn split_long_word(
    word: &str,
    max_width_mm: f32,
    measurer: &dyn TextMeasurer,
    font: &FontSpec,
    size_pt: f32,
) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() > 1
            && measurer.text_width_mm(&current, font, size_pt) > max_width_mm
        {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Intrinsic pixel size of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageSize {
    /// Create a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height over width.
    pub fn aspect(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// Looks up the intrinsic size of an image reference.
///
/// The flow engine calls this once per image, in reading order, before
/// making any layout decision that depends on the image height.
pub trait ImageMeasurer: Send + Sync {
    /// Measure the image at `src` (URL, path or `data:` URI).
    fn measure(&self, src: &str) -> Result<ImageSize, ImageError>;
}

impl<F> ImageMeasurer for F
where
    F: Fn(&str) -> Result<ImageSize, ImageError> + Send + Sync,
{
    fn measure(&self, src: &str) -> Result<ImageSize, ImageError> {
        self(src)
    }
}

/// Image sizes known ahead of time, keyed by `src`.
///
/// Also records failures, so a pre-resolved lookup reports the same error as
/// the measurer that filled it.
#[derive(Debug, Clone, Default)]
pub struct ImageSizes {
    sizes: HashMap<String, Result<ImageSize, String>>,
}

impl ImageSizes {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a size.
    pub fn insert(&mut self, src: impl Into<String>, size: ImageSize) {
        self.sizes.insert(src.into(), Ok(size));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, src: impl Into<String>, width: u32, height: u32) -> Self {
        self.insert(src, ImageSize::new(width, height));
        self
    }

    /// Record a failure.
    pub fn insert_error(&mut self, src: impl Into<String>, reason: impl Into<String>) {
        self.sizes.insert(src.into(), Err(reason.into()));
    }

    /// Check if `src` has an entry.
    pub fn contains(&self, src: &str) -> bool {
        self.sizes.contains_key(src)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl ImageMeasurer for ImageSizes {
    fn measure(&self, src: &str) -> Result<ImageSize, ImageError> {
        match self.sizes.get(src) {
            Some(Ok(size)) => Ok(*size),
            Some(Err(reason)) => Err(ImageError::new(src, reason.clone())),
            None => Err(ImageError::new(src, "no size recorded")),
        }
    }
}
