//! Document model types for book content and layout settings.
//!
//! The model is what the surrounding editor hands to the engine: an ordered
//! list of sections with their markup text and images, plus the typographic
//! settings. Parsed markup ([`Block`], [`InlineRun`]) also lives here so the
//! parser and the layout engine share one vocabulary.

mod document;
mod image;
mod markup;
mod settings;

pub use document::{BookInfo, Document, Section, SectionKind, Subsection};
pub use image::{Image, ImageAlignment};
pub use markup::{Block, InlineRun, ListItem, ListKind};
pub use settings::{
    DocumentSettings, FontRole, FontSpec, Fonts, Margins, NumberPosition, NumberStyle,
    PageNumbering, PaperSize, RunningText, TableOfContents, TextAlignment, MM_PER_PT,
};

pub(crate) use markup::runs_text;
