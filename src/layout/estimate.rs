//! Character-count page estimator.
//!
//! Fills `page_number` on every section and subsection without laying out
//! any text. The numbers are a heuristic for displaying a table of contents
//! before a full layout, and routinely differ from what the flow engine
//! produces for uneven paragraph lengths.

use serde::{Deserialize, Serialize};

use super::geometry::PageGeometry;
use super::numbering::{Counters, NumberSystem};
use super::validate::validate;
use crate::error::{Error, Result};
use crate::model::{Document, FontRole, DocumentSettings, MM_PER_PT};

/// Images assumed to share one page.
const IMAGES_PER_PAGE: usize = 2;

/// Pages reserved for a section heading.
const HEADING_PAGES: u32 = 1;

/// Text capacity of one page in the paragraph font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageBudget {
    /// Characters fitting one line of the content width
    pub chars_per_line: usize,
    /// Lines fitting the content height at the font's line height
    pub lines_per_page: usize,
    /// Product of the two
    pub chars_per_page: usize,
}

impl PageBudget {
    /// Compute the budget from paper size, margins and the paragraph font.
    pub fn from_settings(settings: &DocumentSettings) -> Result<Self> {
        let geometry = PageGeometry::from_settings(settings);
        let font = settings.font(FontRole::Paragraph);
        let chars_per_line = (geometry.content_width() / (font.size_pt * MM_PER_PT)).floor();
        let lines_per_page =
            (geometry.content_height() / (font.size_pt * font.line_height * MM_PER_PT)).floor();
        let chars_per_line = chars_per_line.max(0.0) as usize;
        let lines_per_page = lines_per_page.max(0.0) as usize;
        let chars_per_page = chars_per_line * lines_per_page;
        if chars_per_page == 0 {
            return Err(Error::InvalidSettings(format!(
                "page holds no text ({} chars per line, {} lines per page)",
                chars_per_line, lines_per_page
            )));
        }
        Ok(Self {
            chars_per_line,
            lines_per_page,
            chars_per_page,
        })
    }

    /// Pages needed for `text`, counted in characters.
    pub fn content_pages(&self, text: &str) -> u32 {
        text.chars().count().div_ceil(self.chars_per_page) as u32
    }
}

/// Estimated placement of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionEstimate {
    /// Section id
    pub section_id: String,
    /// Section title
    pub title: String,
    /// Counter the section is numbered with
    pub system: NumberSystem,
    /// Estimated first page
    pub page_number: u32,
    /// Pages budgeted for the content text
    pub content_pages: u32,
    /// Pages budgeted for images, two per page
    pub image_pages: u32,
    /// Pages the counter advanced for the section body, heading included
    pub total_pages: u32,
    /// Subsection estimates in document order
    pub subsections: Vec<SubsectionEstimate>,
}

/// Estimated placement of one subsection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionEstimate {
    /// Subsection id
    pub subsection_id: String,
    /// Subsection title
    pub title: String,
    /// Estimated first page
    pub page_number: u32,
    /// Pages budgeted for the content text
    pub content_pages: u32,
}

/// Estimate page numbers and return an updated copy of the document.
pub fn estimate(doc: &Document) -> Result<Document> {
    let mut updated = doc.clone();
    estimate_in_place(&mut updated)?;
    Ok(updated)
}

/// Estimate page numbers, writing them into the document.
pub fn estimate_in_place(doc: &mut Document) -> Result<Vec<SectionEstimate>> {
    let report = estimate_report(doc)?;
    for (section, est) in doc.sections.iter_mut().zip(&report) {
        section.page_number = Some(est.page_number);
        for (sub, sub_est) in section.subsections.iter_mut().zip(&est.subsections) {
            sub.page_number = Some(sub_est.page_number);
        }
    }
    Ok(report)
}

/// Estimate page numbers without modifying the document.
pub fn estimate_report(doc: &Document) -> Result<Vec<SectionEstimate>> {
    validate(doc)?;
    let budget = PageBudget::from_settings(&doc.settings)?;
    log::debug!(
        "estimating {} sections at {} chars/line x {} lines/page",
        doc.sections.len(),
        budget.chars_per_line,
        budget.lines_per_page
    );

    let mut counters = Counters::new(doc.settings.page_numbering.start_from);
    let mut report = Vec::with_capacity(doc.sections.len());

    for section in &doc.sections {
        let system = NumberSystem::for_kind(section.kind);
        let page_number = counters.current(system);
        let content_pages = budget.content_pages(&section.content);
        let image_pages = section.images.len().div_ceil(IMAGES_PER_PAGE) as u32;
        let total_pages = content_pages + image_pages + HEADING_PAGES;
        counters.advance(system, total_pages);

        let mut subsections = Vec::with_capacity(section.subsections.len());
        for sub in &section.subsections {
            let sub_number = counters.current(system);
            let sub_pages = budget.content_pages(&sub.content);
            counters.advance(system, sub_pages);
            subsections.push(SubsectionEstimate {
                subsection_id: sub.id.clone(),
                title: sub.title.clone(),
                page_number: sub_number,
                content_pages: sub_pages,
            });
        }

        log::debug!(
            "section {} estimated at page {} ({} content + {} image pages)",
            section.id,
            page_number,
            content_pages,
            image_pages
        );

        report.push(SectionEstimate {
            section_id: section.id.clone(),
            title: section.title.clone(),
            system,
            page_number,
            content_pages,
            image_pages,
            total_pages,
            subsections,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Image, Margins, Section, Subsection};

    fn budget() -> PageBudget {
        PageBudget::from_settings(&DocumentSettings::default()).unwrap()
    }

    #[test]
    fn test_default_budget() {
        // A4, 25.4 mm margins, 12 pt at 1.5: 159.2 / 4.233 and 246.2 / 6.35
        let b = budget();
        assert_eq!(b.chars_per_line, 37);
        assert_eq!(b.lines_per_page, 38);
        assert_eq!(b.chars_per_page, 37 * 38);
    }

    #[test]
    fn test_content_pages_boundary() {
        let b = budget();
        assert_eq!(b.content_pages(""), 0);
        assert_eq!(b.content_pages(&"x".repeat(b.chars_per_page)), 1);
        assert_eq!(b.content_pages(&"x".repeat(b.chars_per_page + 1)), 2);
    }

    #[test]
    fn test_counts_chars_not_bytes() {
        let b = budget();
        assert_eq!(b.content_pages(&"é".repeat(b.chars_per_page)), 1);
    }

    #[test]
    fn test_zero_capacity_is_an_error() {
        let settings = DocumentSettings::default().with_margins(Margins {
            top: 14.8,
            bottom: 14.8,
            left: 1.0,
            right: 1.0,
        });
        assert!(matches!(
            PageBudget::from_settings(&settings),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_counters_per_kind() {
        let doc = Document::new()
            .section(Section::front_matter("p", "Preface"))
            .section(
                Section::chapter("c1", "One")
                    .with_image(Image::new("a", "a.png"))
                    .with_image(Image::new("b", "b.png"))
                    .with_image(Image::new("c", "c.png")),
            )
            .section(Section::chapter("c2", "Two"))
            .section(Section::front_matter("f", "Foreword"));
        let updated = estimate(&doc).unwrap();
        let numbers: Vec<_> = updated.sections.iter().map(|s| s.page_number).collect();
        // c1: 0 content + 2 image pages + heading
        assert_eq!(numbers, vec![Some(1), Some(1), Some(4), Some(2)]);
    }

    #[test]
    fn test_subsections_numbered_after_parent() {
        let b = budget();
        let doc = Document::new().section(
            Section::chapter("c", "C")
                .with_content("x".repeat(b.chars_per_page + 1))
                .with_subsection(Subsection::new("s1", "S1").with_content("short"))
                .with_subsection(Subsection::new("s2", "S2")),
        );
        let report = estimate_report(&doc).unwrap();
        assert_eq!(report[0].total_pages, 3);
        assert_eq!(report[0].subsections[0].page_number, 4);
        assert_eq!(report[0].subsections[1].page_number, 5);
    }

    #[test]
    fn test_start_from() {
        let mut doc = Document::with_settings(DocumentSettings::default().with_start_from(5));
        doc.add_section(Section::chapter("c", "C"));
        doc.add_section(Section::chapter("d", "D"));
        let report = estimate_in_place(&mut doc).unwrap();
        assert_eq!(report[1].page_number, 6);
        assert_eq!(doc.sections[0].page_number, Some(5));
    }
}
