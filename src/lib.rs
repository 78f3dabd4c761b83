//! # bindery
//!
//! Markup parsing, page estimation and pagination for book layouts.
//!
//! A [`Document`] holds front matter, numbered chapters and back matter, each
//! with free-form markup text, images and nested subsections. This crate turns
//! it into pages of positioned draw operations that any PDF or canvas writer
//! can paint, with roman-numbered front matter, arabic-numbered main matter
//! and a table of contents.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bindery::Bindery;
//!
//! fn main() -> bindery::Result<()> {
//!     let layout = Bindery::new().load("book.json")?;
//!     println!("{} pages", layout.page_count());
//!     println!("{}", layout.to_text());
//!     Ok(())
//! }
//! ```
//!
//! ## Components
//!
//! - **Inline lexer / block parser** ([`parser`]): author markup to
//!   [`Block`]s and styled [`InlineRun`]s; never fails
//! - **Estimator** ([`estimate`]): character-count page numbers for a
//!   table of contents before layout
//! - **Flow engine** ([`FlowEngine`]): the authoritative line-by-line
//!   pagination
//! - **Output** ([`render`]): JSON and a plain-text proof of the pages

pub mod detect;
pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use detect::{classify_source, detect_image_kind, ImageKind, ImageSource};
pub use error::{Error, ImageError, Result};
#[cfg(feature = "decode")]
pub use layout::DecodingMeasurer;
pub use layout::{
    estimate, estimate_in_place, validate, CancelToken, DrawOp, FlowEngine, ImageMeasurer,
    ImageSize, ImageSizes, LayoutOptions, LayoutResult, LayoutStats, NumberSystem, Page,
    TextMeasurer, TocPageSource,
};
pub use model::{
    Block, BookInfo, Document, DocumentSettings, FontRole, FontSpec, Image, ImageAlignment,
    InlineRun, ListItem, ListKind, PageNumbering, PaperSize, Section, SectionKind, Subsection,
    TextAlignment,
};
pub use parser::{lex, parse_blocks, strip_markup, MarkupOptions};
pub use render::JsonFormat;

use std::path::Path;

/// Load a document from an editor JSON file.
///
/// # Example
///
/// ```no_run
/// let doc = bindery::load_document("book.json").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Document> {
    let json = std::fs::read_to_string(path)?;
    Document::from_json(&json)
}

/// Parse markup text into blocks with default options.
pub fn parse_markup(text: &str) -> Vec<Block> {
    parse_blocks(text)
}

/// Lay out a document with default options, reading image sizes from data
/// URIs and local files.
pub fn layout_document(doc: &Document) -> Result<LayoutResult> {
    Bindery::new().layout(doc).map(|layout| layout.result)
}

/// Image measurer used when the caller supplies none.
fn default_measurer() -> Box<dyn ImageMeasurer> {
    #[cfg(feature = "decode")]
    {
        Box::new(DecodingMeasurer::new())
    }
    #[cfg(not(feature = "decode"))]
    {
        Box::new(ImageSizes::new())
    }
}

/// Builder for estimating and laying out a document in one go.
///
/// # Example
///
/// ```no_run
/// use bindery::Bindery;
///
/// let json = Bindery::new()
///     .sequential()
///     .reconciled()
///     .with_tab_stop(2)
///     .load("book.json")?
///     .to_json(bindery::JsonFormat::Compact)?;
/// # Ok::<(), bindery::Error>(())
/// ```
pub struct Bindery {
    options: LayoutOptions,
    estimate_first: bool,
}

impl Bindery {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: LayoutOptions::default(),
            estimate_first: true,
        }
    }

    /// Parse markup on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Print laid-out page numbers in the table of contents.
    pub fn reconciled(mut self) -> Self {
        self.options = self.options.reconciled();
        self
    }

    /// Set the markup tab stop.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.options = self.options.with_tab_stop(tab_stop);
        self
    }

    /// Leave out cover pages.
    pub fn without_covers(mut self) -> Self {
        self.options = self.options.with_covers(false);
        self
    }

    /// Keep the document's stored page numbers instead of estimating them.
    pub fn keep_page_numbers(mut self) -> Self {
        self.estimate_first = false;
        self
    }

    /// Set all layout options.
    pub fn with_options(mut self, options: LayoutOptions) -> Self {
        self.options = options;
        self
    }

    /// Load a document file and lay it out.
    pub fn load<P: AsRef<Path>>(self, path: P) -> Result<BinderyResult> {
        let doc = load_document(path)?;
        self.layout(&doc)
    }

    /// Lay out a document with the default image measurer.
    pub fn layout(self, doc: &Document) -> Result<BinderyResult> {
        let measurer = default_measurer();
        self.layout_with(doc, measurer.as_ref())
    }

    /// Lay out a document, measuring images with `images`.
    pub fn layout_with(self, doc: &Document, images: &dyn ImageMeasurer) -> Result<BinderyResult> {
        let document = if self.estimate_first {
            estimate(doc)?
        } else {
            doc.clone()
        };
        let result = FlowEngine::new(self.options).render(&document, images)?;
        Ok(BinderyResult { document, result })
    }
}

impl Default for Bindery {
    fn default() -> Self {
        Self::new()
    }
}

/// A laid-out document.
pub struct BinderyResult {
    /// The document with estimated page numbers
    pub document: Document,
    /// Pages, warnings and statistics
    pub result: LayoutResult,
}

impl BinderyResult {
    /// Get the pages.
    pub fn pages(&self) -> &[Page] {
        &self.result.pages
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.result.page_count()
    }

    /// Convert the pages to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.result, format)
    }

    /// Render a plain-text proof.
    pub fn to_text(&self) -> String {
        render::to_text(&self.result)
    }

    /// Get the document with the laid-out page numbers written back.
    pub fn numbered_document(&self) -> Document {
        let mut doc = self.document.clone();
        self.result.apply_page_numbers(&mut doc);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindery_builder() {
        let bindery = Bindery::new().sequential().reconciled().without_covers();
        assert!(!bindery.options.parallel);
        assert!(!bindery.options.include_cover);
        assert_eq!(bindery.options.toc_source, TocPageSource::Reconciled);
        assert!(bindery.estimate_first);
    }

    #[test]
    fn test_layout_estimates_first() {
        let doc = Document::new()
            .section(Section::front_matter("p", "Preface"))
            .section(Section::chapter("c", "One"));
        let layout = Bindery::new().layout(&doc).unwrap();
        assert_eq!(layout.document.sections[1].page_number, Some(1));
        assert_eq!(layout.page_count(), 4);
        // Title page and TOC take i and ii, so the preface lands on iii.
        let numbered = layout.numbered_document();
        assert_eq!(numbered.sections[0].page_number, Some(3));
    }

    #[test]
    fn test_load_document_missing_file() {
        let result = load_document("/nonexistent/book.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_document_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_document(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_parse_markup() {
        let blocks = parse_markup("# Title\n\nText");
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].is_heading());
    }
}
