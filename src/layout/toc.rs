//! Table of contents pass.
//!
//! Runs right after the title page on roman-numbered pages. Displayed numbers
//! are whatever each section carries in `page_number` when the pass starts.

use super::engine::Flow;
use super::geometry::{
    TOC_FIRST_ENTRY_MM, TOC_ROW_ADVANCE_MM, TOC_SUBROW_GAP_MM, TOC_SUBROW_INDENT_MM,
};
use super::numbering::NumberSystem;
use super::page::{DrawOp, TextOp, TextRole};
use crate::error::Result;
use crate::model::{FontRole, FontSpec, TextAlignment};

impl Flow<'_> {
    pub(super) fn toc_pass(&mut self) -> Result<()> {
        let doc = self.doc;
        let toc = &doc.settings.table_of_contents;
        self.begin_toc_page()?;

        let g = self.geometry;
        let heading_font = doc.settings.font(FontRole::Subtitle);
        let heading = TextOp::new(
            toc.title.as_str(),
            g.margin_left,
            g.section_title_y(),
            heading_font,
            TextRole::TocHeading,
        )
        .aligned(TextAlignment::Left);
        self.draw(DrawOp::Text(heading));
        self.y = g.margin_top + TOC_FIRST_ENTRY_MM;

        let font = doc.settings.font(FontRole::Paragraph);
        let ordinals = doc.chapter_ordinals();
        log::debug!("table of contents with {} entries", doc.sections.len());

        for (section, ordinal) in doc.sections.iter().zip(ordinals) {
            let system = NumberSystem::for_kind(section.kind);
            let entry = match ordinal {
                Some(n) => format!("{}. {}", n, section.title),
                None => section.title.clone(),
            };
            let number = self.toc_number(system, section.page_number);
            self.toc_row(entry, number, g.margin_left, font)?;
            self.y += TOC_ROW_ADVANCE_MM;

            if !toc.include_subsections {
                continue;
            }
            for sub in &section.subsections {
                let number = self.toc_number(system, sub.page_number);
                self.toc_row(
                    sub.title.clone(),
                    number,
                    g.margin_left + TOC_SUBROW_INDENT_MM,
                    font,
                )?;
                self.y += TOC_SUBROW_GAP_MM;
            }
        }
        Ok(())
    }

    fn begin_toc_page(&mut self) -> Result<()> {
        self.begin_page(Some(NumberSystem::Roman), true)?;
        self.stats.toc_pages += 1;
        Ok(())
    }

    /// A missing number falls back to the counter current at the TOC pass.
    fn toc_number(&self, system: NumberSystem, page_number: Option<u32>) -> String {
        let value = page_number.unwrap_or_else(|| self.counters.current(system));
        self.label_text(system, value)
    }

    fn toc_row(&mut self, entry: String, number: String, x: f32, font: &FontSpec) -> Result<()> {
        if self.y > self.geometry.bottom_limit() {
            self.begin_toc_page()?;
        }
        let g = self.geometry;
        let entry =
            TextOp::new(entry, x, self.y, font, TextRole::TocEntry).aligned(TextAlignment::Left);
        let number = TextOp::new(
            number,
            g.page_width - g.margin_right,
            self.y,
            font,
            TextRole::TocNumber,
        )
        .aligned(TextAlignment::Right);
        self.draw(DrawOp::Text(entry));
        self.draw(DrawOp::Text(number));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::{FlowEngine, ImageSizes, LayoutOptions, TextRole};
    use crate::model::{Document, Section, Subsection};

    fn toc_texts(doc: &Document, role: TextRole) -> Vec<String> {
        let result = FlowEngine::new(LayoutOptions::new().sequential())
            .render(doc, &ImageSizes::new())
            .unwrap();
        result.pages[1]
            .texts_with_role(role)
            .map(|t| t.text.clone())
            .collect()
    }

    #[test]
    fn test_entries_and_ordinals() {
        let mut preface = Section::front_matter("p", "Preface");
        preface.page_number = Some(3);
        let mut one = Section::chapter("c1", "Beginnings");
        one.page_number = Some(1);
        let doc = Document::new()
            .section(preface)
            .section(one.with_subsection(Subsection::new("s", "Early days")))
            .section(Section::back_matter("b", "Notes"));

        let entries = toc_texts(&doc, TextRole::TocEntry);
        assert_eq!(entries, vec!["Preface", "1. Beginnings", "Early days", "Notes"]);

        // "Early days" and "Notes" have no number and use the current counters
        let numbers = toc_texts(&doc, TextRole::TocNumber);
        assert_eq!(numbers, vec!["iii", "1", "1", "1"]);
    }

    #[test]
    fn test_subsections_can_be_hidden() {
        let mut doc = Document::new().section(
            Section::chapter("c", "C").with_subsection(Subsection::new("s", "S")),
        );
        doc.settings.table_of_contents.include_subsections = false;
        assert_eq!(toc_texts(&doc, TextRole::TocEntry), vec!["1. C"]);
    }

    #[test]
    fn test_long_toc_spills_onto_more_pages() {
        let mut doc = Document::new();
        for i in 0..40 {
            doc.add_section(Section::chapter(format!("c{}", i), format!("Chapter {}", i)));
        }
        let result = FlowEngine::default().render(&doc, &ImageSizes::new()).unwrap();
        assert_eq!(result.stats.toc_pages, 2);
        assert_eq!(result.pages[2].label.as_ref().unwrap().text, "iii");
        assert_eq!(result.span("c0").unwrap().first_number, 1);
    }
}
