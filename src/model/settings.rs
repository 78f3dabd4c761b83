//! Typography, page geometry and numbering settings.

use serde::{Deserialize, Serialize};

/// Millimeters per typographic point.
pub const MM_PER_PT: f32 = 0.352778;

/// Document-wide layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentSettings {
    /// Paper size
    pub paper_size: PaperSize,

    /// Page margins in centimeters
    pub margins: Margins,

    /// Font for each text role
    pub fonts: Fonts,

    /// Page number stamping
    pub page_numbering: PageNumbering,

    /// Table of contents pass
    pub table_of_contents: TableOfContents,

    /// Running header text
    pub header: RunningText,

    /// Running footer text
    pub footer: RunningText,
}

impl DocumentSettings {
    /// Create settings with editor defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the paper size.
    pub fn with_paper_size(mut self, paper_size: PaperSize) -> Self {
        self.paper_size = paper_size;
        self
    }

    /// Set all margins (centimeters).
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Enable or disable the table of contents.
    pub fn with_toc(mut self, enabled: bool) -> Self {
        self.table_of_contents.enabled = enabled;
        self
    }

    /// Set the first page number of both numbering systems.
    pub fn with_start_from(mut self, start: u32) -> Self {
        self.page_numbering.start_from = start;
        self
    }

    /// Get the font for a text role.
    pub fn font(&self, role: FontRole) -> &FontSpec {
        self.fonts.get(role)
    }
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            margins: Margins::uniform(2.54),
            fonts: Fonts::default(),
            page_numbering: PageNumbering::default(),
            table_of_contents: TableOfContents::default(),
            header: RunningText::default(),
            footer: RunningText::default(),
        }
    }
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    /// 210 x 297 mm
    #[default]
    A4,
    /// 8.5 x 11 in
    Letter,
    /// 8.5 x 14 in
    Legal,
}

impl PaperSize {
    /// Page (width, height) in millimeters, portrait.
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
        }
    }
}

/// Page margins in centimeters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Top margin
    pub top: f32,
    /// Bottom margin
    pub bottom: f32,
    /// Left margin
    pub left: f32,
    /// Right margin
    pub right: f32,
}

impl Margins {
    /// Same margin on every side.
    pub fn uniform(cm: f32) -> Self {
        Self {
            top: cm,
            bottom: cm,
            left: cm,
            right: cm,
        }
    }

    /// Iterate over `(name, value)` pairs, used by validation messages.
    pub(crate) fn named(&self) -> [(&'static str, f32); 4] {
        [
            ("top", self.top),
            ("bottom", self.bottom),
            ("left", self.left),
            ("right", self.right),
        ]
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(2.54)
    }
}

/// Text role used to pick a [`FontSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRole {
    /// Book title on the title page
    Title,
    /// Section titles, author line, TOC heading
    Subtitle,
    /// Body text
    Paragraph,
    /// Running header
    Header,
    /// Running footer and page numbers
    Footer,
}

impl FontRole {
    /// Every role, in declaration order.
    pub const ALL: [FontRole; 5] = [
        FontRole::Title,
        FontRole::Subtitle,
        FontRole::Paragraph,
        FontRole::Header,
        FontRole::Footer,
    ];
}

/// One font setting per [`FontRole`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fonts {
    /// Title font
    pub title: FontSpec,
    /// Subtitle font
    pub subtitle: FontSpec,
    /// Paragraph font
    pub paragraph: FontSpec,
    /// Header font
    pub header: FontSpec,
    /// Footer font
    pub footer: FontSpec,
}

impl Fonts {
    /// Look up the font for a role.
    pub fn get(&self, role: FontRole) -> &FontSpec {
        match role {
            FontRole::Title => &self.title,
            FontRole::Subtitle => &self.subtitle,
            FontRole::Paragraph => &self.paragraph,
            FontRole::Header => &self.header,
            FontRole::Footer => &self.footer,
        }
    }

    /// Mutable lookup of the font for a role.
    pub fn get_mut(&mut self, role: FontRole) -> &mut FontSpec {
        match role {
            FontRole::Title => &mut self.title,
            FontRole::Subtitle => &mut self.subtitle,
            FontRole::Paragraph => &mut self.paragraph,
            FontRole::Header => &mut self.header,
            FontRole::Footer => &mut self.footer,
        }
    }
}

impl Default for Fonts {
    fn default() -> Self {
        Self {
            title: FontSpec::new("Helvetica", 24.0, TextAlignment::Center, 1.5),
            subtitle: FontSpec::new("Helvetica", 18.0, TextAlignment::Left, 1.5),
            paragraph: FontSpec::new("Helvetica", 12.0, TextAlignment::Justify, 1.5),
            header: FontSpec::new("Helvetica", 10.0, TextAlignment::Center, 1.2),
            footer: FontSpec::new("Helvetica", 10.0, TextAlignment::Center, 1.2),
        }
    }
}

/// Font family, size and paragraph alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSpec {
    /// Font family name
    pub family: String,
    /// Size in points
    #[serde(alias = "size")]
    pub size_pt: f32,
    /// Paragraph alignment
    pub alignment: TextAlignment,
    /// Line height multiplier
    pub line_height: f32,
}

impl FontSpec {
    /// Create a font spec.
    pub fn new(
        family: impl Into<String>,
        size_pt: f32,
        alignment: TextAlignment,
        line_height: f32,
    ) -> Self {
        Self {
            family: family.into(),
            size_pt,
            alignment,
            line_height,
        }
    }

    /// Font size converted to millimeters.
    pub fn size_mm(&self) -> f32 {
        self.size_pt * MM_PER_PT
    }
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}

impl TextAlignment {
    /// Swap left and right, used for mirrored even pages.
    pub fn mirrored(self) -> Self {
        match self {
            TextAlignment::Left => TextAlignment::Right,
            TextAlignment::Right => TextAlignment::Left,
            other => other,
        }
    }
}

/// Page number stamping configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageNumbering {
    /// Draw page numbers at all
    pub enabled: bool,
    /// First number of both numbering systems
    pub start_from: u32,
    /// Top or bottom of the page
    pub position: NumberPosition,
    /// Horizontal placement
    pub alignment: TextAlignment,
    /// Numeral style of main-matter pages
    pub style: NumberStyle,
}

impl Default for PageNumbering {
    fn default() -> Self {
        Self {
            enabled: true,
            start_from: 1,
            position: NumberPosition::Bottom,
            alignment: TextAlignment::Center,
            style: NumberStyle::Decimal,
        }
    }
}

/// Vertical page number position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberPosition {
    /// Above the content box
    Top,
    /// Below the content box
    #[default]
    Bottom,
}

/// Numeral style for main-matter page numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberStyle {
    /// 1, 2, 3
    #[default]
    Decimal,
    /// i, ii, iii
    Roman,
    /// Numbers are counted but not drawn
    None,
}

/// Table of contents configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOfContents {
    /// Emit a TOC after the title page
    pub enabled: bool,
    /// Heading of the TOC page
    pub title: String,
    /// List subsections under their section
    #[serde(alias = "includeSubChapters")]
    pub include_subsections: bool,
}

impl Default for TableOfContents {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Table of Contents".to_string(),
            include_subsections: true,
        }
    }
}

/// Running header or footer text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningText {
    /// Draw the text
    pub enabled: bool,
    /// Text to draw
    pub text: String,
    /// Mirror alignment on even pages
    pub alternate_even_odd: bool,
}
