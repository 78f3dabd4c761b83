//! Page geometry in millimeters and the fixed layout offsets.

use crate::model::{DocumentSettings, FontSpec, TextAlignment, MM_PER_PT};

/// Offset of a section title below the top margin.
pub const TITLE_OFFSET_MM: f32 = 20.0;
/// Gap between a section title and its first body line.
pub const TITLE_BODY_GAP_MM: f32 = 20.0;
/// Space an image needs below the cursor before it forces a page break.
pub const IMAGE_RESERVE_MM: f32 = 40.0;
/// Space a subsection heading needs below the cursor before it forces a page break.
pub const SUBSECTION_RESERVE_MM: f32 = 20.0;
/// Gap above a subsection title.
pub const SUBSECTION_TITLE_GAP_MM: f32 = 20.0;
/// Gap between a subsection title and its first body line.
pub const SUBSECTION_BODY_GAP_MM: f32 = 15.0;
/// Subsection titles use the subtitle size scaled by this factor.
pub const SUBSECTION_TITLE_SCALE: f32 = 0.8;
/// Gap below an image.
pub const IMAGE_GAP_MM: f32 = 10.0;
/// Vertical space taken by an image caption.
pub const CAPTION_ADVANCE_MM: f32 = 15.0;
/// Captions use the paragraph size scaled by this factor.
pub const CAPTION_SCALE: f32 = 0.8;
/// Horizontal offset per unit of section indentation.
pub const SECTION_INDENT_MM: f32 = 10.0;
/// Horizontal offset per markup indentation level.
pub const BLOCK_INDENT_MM: f32 = 5.0;
/// Title page: title baseline below the top margin.
pub const TITLE_PAGE_TITLE_MM: f32 = 40.0;
/// Title page: author baseline below the top margin.
pub const TITLE_PAGE_AUTHOR_MM: f32 = 60.0;
/// Table of contents: first entry below the top margin.
pub const TOC_FIRST_ENTRY_MM: f32 = 40.0;
/// Table of contents: advance after a section row.
pub const TOC_ROW_ADVANCE_MM: f32 = 10.0;
/// Table of contents: advance after a subsection row.
pub const TOC_SUBROW_GAP_MM: f32 = 8.0;
/// Table of contents: indentation of subsection rows.
pub const TOC_SUBROW_INDENT_MM: f32 = 10.0;
/// Page number stamp above the content box when placed at the top.
pub const NUMBER_TOP_OFFSET_MM: f32 = 5.0;

/// Physical page and content box, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    /// Page width
    pub page_width: f32,
    /// Page height
    pub page_height: f32,
    /// Top margin
    pub margin_top: f32,
    /// Bottom margin
    pub margin_bottom: f32,
    /// Left margin
    pub margin_left: f32,
    /// Right margin
    pub margin_right: f32,
}

impl PageGeometry {
    /// Derive geometry from settings (margins are given in centimeters).
    pub fn from_settings(settings: &DocumentSettings) -> Self {
        let (page_width, page_height) = settings.paper_size.dimensions_mm();
        let m = &settings.margins;
        Self {
            page_width,
            page_height,
            margin_top: m.top * 10.0,
            margin_bottom: m.bottom * 10.0,
            margin_left: m.left * 10.0,
            margin_right: m.right * 10.0,
        }
    }

    /// Width of the content box.
    pub fn content_width(&self) -> f32 {
        self.page_width - (self.margin_left + self.margin_right)
    }

    /// Height of the content box.
    pub fn content_height(&self) -> f32 {
        self.page_height - (self.margin_top + self.margin_bottom)
    }

    /// Lowest y at which a line may still be drawn.
    pub fn bottom_limit(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    /// Y of a section title.
    pub fn section_title_y(&self) -> f32 {
        self.margin_top + TITLE_OFFSET_MM
    }

    /// Y of the first body line of a section.
    pub fn section_body_start(&self) -> f32 {
        self.section_title_y() + TITLE_BODY_GAP_MM
    }

    /// X for text or stamps anchored by `alignment` across the content box.
    pub fn anchor_x(&self, alignment: TextAlignment) -> f32 {
        match alignment {
            TextAlignment::Left | TextAlignment::Justify => self.margin_left,
            TextAlignment::Center => self.page_width / 2.0,
            TextAlignment::Right => self.page_width - self.margin_right,
        }
    }

    /// Number of lines drawn from `start_y` before the cursor passes the bottom limit.
    ///
    /// Mirrors the flow engine's accumulation so the result matches the real
    /// break point exactly.
    pub fn lines_fitting(&self, start_y: f32, advance: f32) -> usize {
        if advance <= 0.0 {
            return 0;
        }
        let limit = self.bottom_limit();
        let mut y = start_y;
        let mut lines = 0;
        while y <= limit {
            lines += 1;
            y += advance;
        }
        lines
    }
}

/// Vertical advance of one body line.
pub fn line_advance(font: &FontSpec, line_spacing: f32) -> f32 {
    font.size_pt * line_spacing * MM_PER_PT
}

/// Extra space after each paragraph.
pub fn paragraph_gap(font: &FontSpec) -> f32 {
    font.size_pt * MM_PER_PT
}
