//! Layout result with warnings and statistics.

use serde::{Deserialize, Serialize};

use super::numbering::NumberSystem;
use super::page::Page;
use crate::error::ImageError;
use crate::model::Document;

/// Result of a flow-engine pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutResult {
    /// Pages in output order
    pub pages: Vec<Page>,

    /// Images that could not be measured and were skipped
    pub warnings: Vec<ImageError>,

    /// Layout statistics
    pub stats: LayoutStats,

    /// Where each section landed
    pub spans: Vec<SectionSpan>,
}

impl LayoutResult {
    /// Get the number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if any image was skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get the span of a section by id.
    pub fn span(&self, section_id: &str) -> Option<&SectionSpan> {
        self.spans.iter().find(|s| s.section_id == section_id)
    }

    /// Pages belonging to a section.
    pub fn section_pages(&self, section_id: &str) -> &[Page] {
        match self.span(section_id) {
            Some(span) => &self.pages[span.first_page..span.first_page + span.page_count],
            None => &[],
        }
    }

    /// Copy the laid-out starting page numbers into the document's
    /// `page_number` fields, replacing the estimates.
    pub fn apply_page_numbers(&self, doc: &mut Document) {
        for section in &mut doc.sections {
            let Some(span) = self.spans.iter().find(|s| s.section_id == section.id) else {
                continue;
            };
            section.page_number = Some(span.first_number);
            for sub in &mut section.subsections {
                if let Some(start) = span
                    .subsections
                    .iter()
                    .find(|s| s.subsection_id == sub.id)
                {
                    sub.page_number = Some(start.number);
                }
            }
        }
    }
}

/// Pages occupied by one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSpan {
    /// Section id
    pub section_id: String,

    /// Counter the section's pages are numbered with
    pub system: NumberSystem,

    /// Counter value of the opening page
    pub first_number: u32,

    /// Formatted label of the opening page
    pub first_label: String,

    /// Index of the opening page in [`LayoutResult::pages`]
    pub first_page: usize,

    /// Pages the section occupies, at least one
    pub page_count: usize,

    /// Page each subsection title landed on
    pub subsections: Vec<SubsectionStart>,
}

/// Page a subsection title landed on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionStart {
    /// Subsection id
    pub subsection_id: String,
    /// Counter value of the page the title was drawn on
    pub number: u32,
}

/// Statistics collected during layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutStats {
    /// Pages stamped from the roman counter (title, TOC, front matter)
    pub roman_pages: u32,

    /// Pages stamped from the arabic counter
    pub arabic_pages: u32,

    /// Cover pages
    pub unnumbered_pages: u32,

    /// Table of contents pages
    pub toc_pages: u32,

    /// Wrapped content lines drawn
    pub text_lines: u32,

    /// Images drawn
    pub images_placed: u32,

    /// Images skipped after a measure failure
    pub images_skipped: u32,
}

impl LayoutStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of pages.
    pub fn total_pages(&self) -> u32 {
        self.roman_pages + self.arabic_pages + self.unnumbered_pages
    }

    pub(crate) fn count_page(&mut self, system: Option<NumberSystem>) {
        match system {
            Some(NumberSystem::Roman) => self.roman_pages += 1,
            Some(NumberSystem::Arabic) => self.arabic_pages += 1,
            None => self.unnumbered_pages += 1,
        }
    }
}
