//! Laid-out pages: positioned draw operations.

use serde::{Deserialize, Serialize};

use super::numbering::{NumberSystem, PageLabel};
use crate::model::{FontSpec, TextAlignment};

/// One output page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Physical position in the output (0-based)
    pub index: usize,

    /// Number stamped on the page; `None` for cover pages
    pub label: Option<PageLabel>,

    /// Draw operations in paint order
    pub ops: Vec<DrawOp>,
}

impl Page {
    /// Create an empty, unnumbered page.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            label: None,
            ops: Vec::new(),
        }
    }

    /// Numbering system of the page, if numbered.
    pub fn system(&self) -> Option<NumberSystem> {
        self.label.as_ref().map(|l| l.system)
    }

    /// Counter value of the page, if numbered.
    pub fn number(&self) -> Option<u32> {
        self.label.as_ref().map(|l| l.value)
    }

    /// Iterate over text operations.
    pub fn text_ops(&self) -> impl Iterator<Item = &TextOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Iterate over text operations with a given role.
    pub fn texts_with_role(&self, role: TextRole) -> impl Iterator<Item = &TextOp> {
        self.text_ops().filter(move |t| t.role == role)
    }

    /// Iterate over image operations.
    pub fn image_ops(&self) -> impl Iterator<Item = &ImageOp> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Image(i) => Some(i),
            _ => None,
        })
    }

    /// Get the page-number stamp, if one was drawn.
    pub fn stamp(&self) -> Option<&PageNumberOp> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::PageNumber(n) => Some(n),
            _ => None,
        })
    }

    /// Number of body lines (any text from section content) on the page.
    pub fn body_line_count(&self) -> usize {
        self.text_ops().filter(|t| t.role.is_body()).count()
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

/// A positioned draw operation. Coordinates are millimeters from the top-left
/// page corner; `y` is the text baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// A line of text
    Text(TextOp),
    /// An image box
    Image(ImageOp),
    /// A horizontal rule
    Rule(RuleOp),
    /// The page number stamp
    PageNumber(PageNumberOp),
}

/// What a text line is, for renderers that style by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextRole {
    Title,
    Author,
    TocHeading,
    TocEntry,
    TocNumber,
    SectionTitle,
    SubsectionTitle,
    Body,
    Heading,
    ListItem,
    Quote,
    Code,
    Caption,
    Header,
    Footer,
}

impl TextRole {
    /// Check if the role belongs to wrapped section content.
    pub fn is_body(self) -> bool {
        matches!(
            self,
            TextRole::Body
                | TextRole::Heading
                | TextRole::ListItem
                | TextRole::Quote
                | TextRole::Code
        )
    }
}

/// A line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOp {
    /// Anchor x
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// The line, markup already stripped
    pub text: String,
    /// Font family name
    pub font_family: String,
    /// Font size in points
    pub size_pt: f32,
    /// How `x` anchors the line
    pub alignment: TextAlignment,
    /// What the line is
    pub role: TextRole,
}

impl TextOp {
    pub(crate) fn new(
        text: impl Into<String>,
        x: f32,
        y: f32,
        font: &FontSpec,
        role: TextRole,
    ) -> Self {
        Self {
            x,
            y,
            text: text.into(),
            font_family: font.family.clone(),
            size_pt: font.size_pt,
            alignment: font.alignment,
            role,
        }
    }

    pub(crate) fn sized(mut self, size_pt: f32) -> Self {
        self.size_pt = size_pt;
        self
    }

    pub(crate) fn aligned(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }
}

/// An image box; `y` is the top edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageOp {
    /// Image id, or `cover` / `back-cover`
    pub image_id: String,
    /// Image reference as given in the document
    pub src: String,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Drawn width
    pub width: f32,
    /// Drawn height
    pub height: f32,
}

/// A horizontal rule starting at `x`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOp {
    pub x: f32,
    pub y: f32,
    /// Horizontal length
    pub length: f32,
}

/// The page number stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNumberOp {
    /// Anchor x
    pub x: f32,
    /// Baseline y
    pub y: f32,
    /// Formatted number
    pub text: String,
    /// How `x` anchors the number
    pub alignment: TextAlignment,
    /// Footer font family
    pub font_family: String,
    /// Footer font size in points
    pub size_pt: f32,
}
