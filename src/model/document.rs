//! Book-level types.

use super::{DocumentSettings, Image};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A book as assembled by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Title page and cover information
    #[serde(default)]
    pub info: BookInfo,

    /// Sections in reading order
    #[serde(alias = "chapters", default)]
    pub sections: Vec<Section>,

    /// Layout settings
    #[serde(default)]
    pub settings: DocumentSettings,
}

impl Document {
    /// Create a new empty document with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document with the given settings.
    pub fn with_settings(settings: DocumentSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    /// Parse a document from editor JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the document back to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Append a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Builder form of [`add_section`](Self::add_section).
    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Get a section by id.
    pub fn get_section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Get the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Chapter ordinal (1-based, counting only chapters) for each section.
    pub fn chapter_ordinals(&self) -> Vec<Option<usize>> {
        let mut next = 0;
        self.sections
            .iter()
            .map(|s| {
                if s.kind == SectionKind::Chapter {
                    next += 1;
                    Some(next)
                } else {
                    None
                }
            })
            .collect()
    }

    /// Total number of images, section and subsection level.
    pub fn image_count(&self) -> usize {
        self.sections
            .iter()
            .map(|s| {
                s.images.len() + s.subsections.iter().map(|sub| sub.images.len()).sum::<usize>()
            })
            .sum()
    }
}

/// Book metadata shown on the title and cover pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookInfo {
    /// Book title
    pub title: String,
    /// Author line
    pub author: String,
    /// Blurb (not laid out)
    pub description: String,
    /// Front cover image reference
    pub cover_image: Option<String>,
    /// Back cover image reference
    pub back_cover_image: Option<String>,
}

impl BookInfo {
    /// Create book info with a title and author.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Default::default()
        }
    }
}

/// Where a section sits in the book, which decides its numbering system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Preface, foreword; roman numerals
    FrontMatter,
    /// Numbered chapter; arabic numerals
    #[default]
    Chapter,
    /// Afterword, appendix; arabic numerals continuing the chapters
    BackMatter,
}

impl SectionKind {
    /// Check if the section is numbered with roman numerals.
    pub fn is_front_matter(self) -> bool {
        matches!(self, SectionKind::FrontMatter)
    }
}

/// A front-matter section, chapter or back-matter section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable id assigned by the editor
    pub id: String,

    /// Section title
    pub title: String,

    /// Front matter, chapter or back matter
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: SectionKind,

    /// Markup text
    #[serde(default)]
    pub content: String,

    /// Images laid out after the text
    #[serde(default)]
    pub images: Vec<Image>,

    /// Left indentation of body lines, in em-like units of 10 mm
    #[serde(default)]
    pub indentation: f32,

    /// Line spacing multiplier (>= 1)
    #[serde(default = "default_line_spacing")]
    pub line_spacing: f32,

    /// Nested sections
    #[serde(alias = "subChapters", default)]
    pub subsections: Vec<Subsection>,

    /// Page number derived by the estimator or a layout pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

fn default_line_spacing() -> f32 {
    1.5
}

impl Section {
    /// Create an empty section.
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: SectionKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kind,
            content: String::new(),
            images: Vec::new(),
            indentation: 0.0,
            line_spacing: default_line_spacing(),
            subsections: Vec::new(),
            page_number: None,
        }
    }

    /// Create a chapter.
    pub fn chapter(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, SectionKind::Chapter)
    }

    /// Create a front-matter section.
    pub fn front_matter(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, SectionKind::FrontMatter)
    }

    /// Create a back-matter section.
    pub fn back_matter(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(id, title, SectionKind::BackMatter)
    }

    /// Set the markup content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append an image.
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    /// Append a subsection.
    pub fn with_subsection(mut self, subsection: Subsection) -> Self {
        self.subsections.push(subsection);
        self
    }

    /// Set the line spacing.
    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Set the indentation.
    pub fn with_indentation(mut self, indentation: f32) -> Self {
        self.indentation = indentation;
        self
    }
}

/// A titled subdivision of a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subsection {
    /// Stable id assigned by the editor
    pub id: String,

    /// Subsection title
    pub title: String,

    /// Markup text
    #[serde(default)]
    pub content: String,

    /// Images laid out after the text
    #[serde(default)]
    pub images: Vec<Image>,

    /// Page number derived by the estimator or a layout pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

impl Subsection {
    /// Create a subsection.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: String::new(),
            images: Vec::new(),
            page_number: None,
        }
    }

    /// Set the markup content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Append an image.
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
    }

    #[test]
    fn test_chapter_ordinals_skip_other_kinds() {
        let doc = Document::new()
            .section(Section::front_matter("p", "Preface"))
            .section(Section::chapter("c1", "One"))
            .section(Section::chapter("c2", "Two"))
            .section(Section::back_matter("a", "Afterword"));
        assert_eq!(doc.chapter_ordinals(), vec![None, Some(1), Some(2), None]);
    }

    #[test]
    fn test_from_editor_json() {
        let json = r#"{
            "info": {"title": "Book", "author": "Someone"},
            "chapters": [
                {"id": "c1", "title": "One", "type": "chapter", "content": "Hi",
                 "images": [], "indentation": 0, "lineSpacing": 1.5,
                 "subChapters": [{"id": "s1", "title": "Sub", "content": "x"}]}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].kind, SectionKind::Chapter);
        assert_eq!(doc.sections[0].subsections[0].title, "Sub");
        assert_eq!(doc.info.title, "Book");
        assert!(doc.get_section("c1").is_some());
    }

    #[test]
    fn test_image_count_includes_subsections() {
        let doc = Document::new().section(
            Section::chapter("c", "C")
                .with_image(Image::new("a", "a.png"))
                .with_subsection(Subsection::new("s", "S").with_image(Image::new("b", "b.png"))),
        );
        assert_eq!(doc.image_count(), 2);
    }
}
