//! The flow engine: authoritative pagination.
//!
//! Walks the document in reading order and places every line, image and
//! heading into fixed-size pages. Two counters (roman for the title page,
//! table of contents and front matter; arabic for chapters and back matter)
//! are threaded through a single [`Flow`] value that lives only for one pass.

use rayon::prelude::*;
use unicode_normalization::UnicodeNormalization;

use super::geometry::{
    self, PageGeometry, BLOCK_INDENT_MM, CAPTION_ADVANCE_MM, CAPTION_SCALE, IMAGE_GAP_MM,
    IMAGE_RESERVE_MM, NUMBER_TOP_OFFSET_MM, SECTION_INDENT_MM, SUBSECTION_BODY_GAP_MM,
    SUBSECTION_RESERVE_MM, SUBSECTION_TITLE_GAP_MM, SUBSECTION_TITLE_SCALE, TITLE_PAGE_AUTHOR_MM,
    TITLE_PAGE_TITLE_MM,
};
use super::measure::{wrap_text, HeuristicTextMeasurer, ImageMeasurer, ImageSize, TextMeasurer};
use super::numbering::{Counters, NumberSystem, PageLabel};
use super::options::{CancelToken, LayoutOptions, NeverCancel, TocPageSource};
use super::page::{DrawOp, ImageOp, Page, PageNumberOp, RuleOp, TextOp, TextRole};
use super::result::{LayoutResult, LayoutStats, SectionSpan, SubsectionStart};
use super::validate::validate;
use crate::error::{Error, ImageError, Result};
use crate::model::{
    runs_text, Block, Document, FontRole, FontSpec, Image, ImageAlignment, ListKind,
    NumberPosition, NumberStyle, RunningText, Section, TextAlignment,
};
use crate::parser::{parse_blocks_with, split_paragraphs, MarkupOptions};

/// Face used for fenced code.
const MONOSPACE_FAMILY: &str = "Courier";

static HEURISTIC_MEASURER: HeuristicTextMeasurer = HeuristicTextMeasurer;
static NEVER_CANCEL: NeverCancel = NeverCancel;

/// Lays out documents into pages.
pub struct FlowEngine<'a> {
    options: LayoutOptions,
    text_measurer: &'a dyn TextMeasurer,
    cancel: &'a dyn CancelToken,
}

impl<'a> FlowEngine<'a> {
    /// Create an engine with the heuristic text measurer and no cancellation.
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            text_measurer: &HEURISTIC_MEASURER,
            cancel: &NEVER_CANCEL,
        }
    }

    /// Use a different text width model.
    pub fn with_text_measurer(mut self, measurer: &'a dyn TextMeasurer) -> Self {
        self.text_measurer = measurer;
        self
    }

    /// Poll `token` at every page break.
    pub fn with_cancel_token(mut self, token: &'a dyn CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out `doc`, asking `images` for every image's intrinsic size.
    ///
    /// Settings are validated before any work starts. Images that fail to
    /// measure are skipped and reported in [`LayoutResult::warnings`].
    pub fn render(&self, doc: &Document, images: &dyn ImageMeasurer) -> Result<LayoutResult> {
        validate(doc)?;
        let parsed = self.parse_sections(doc);

        match self.options.toc_source {
            TocPageSource::Estimated => self.run_pass(doc, &parsed, images),
            TocPageSource::Reconciled => {
                let first = self.run_pass(doc, &parsed, images)?;
                let mut numbered = doc.clone();
                first.apply_page_numbers(&mut numbered);
                log::debug!(
                    "reconciling table of contents against {} laid-out pages",
                    first.page_count()
                );
                self.run_pass(&numbered, &parsed, images)
            }
        }
    }

    fn run_pass(
        &self,
        doc: &Document,
        parsed: &[ParsedSection],
        images: &dyn ImageMeasurer,
    ) -> Result<LayoutResult> {
        let mut flow = Flow {
            doc,
            geometry: PageGeometry::from_settings(&doc.settings),
            include_cover: self.options.include_cover,
            text_measurer: self.text_measurer,
            images,
            cancel: self.cancel,
            counters: Counters::new(doc.settings.page_numbering.start_from),
            pages: Vec::new(),
            current: None,
            y: 0.0,
            warnings: Vec::new(),
            stats: LayoutStats::new(),
            spans: Vec::with_capacity(doc.sections.len()),
        };
        flow.run(parsed)?;
        Ok(flow.into_result())
    }

    /// Parse all section markup up front. Parsing is independent per
    /// section, so it may run on the rayon pool; layout never does.
    fn parse_sections(&self, doc: &Document) -> Vec<ParsedSection> {
        let markup = &self.options.markup;
        if self.options.parallel {
            doc.sections
                .par_iter()
                .map(|s| ParsedSection::parse(s, markup))
                .collect()
        } else {
            doc.sections
                .iter()
                .map(|s| ParsedSection::parse(s, markup))
                .collect()
        }
    }
}

impl Default for FlowEngine<'_> {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

/// Blocks of one section, grouped by blank-line separated paragraph.
#[derive(Debug, Clone)]
pub(super) struct ParsedSection {
    body: Vec<Vec<Block>>,
    subsections: Vec<Vec<Vec<Block>>>,
}

impl ParsedSection {
    fn parse(section: &Section, markup: &MarkupOptions) -> Self {
        Self {
            body: parse_paragraphs(&section.content, markup),
            subsections: section
                .subsections
                .iter()
                .map(|sub| parse_paragraphs(&sub.content, markup))
                .collect(),
        }
    }
}

fn parse_paragraphs(content: &str, markup: &MarkupOptions) -> Vec<Vec<Block>> {
    split_paragraphs(content)
        .iter()
        .map(|p| parse_blocks_with(p, markup))
        .collect()
}

fn normalized(text: &str) -> String {
    text.nfc().collect()
}

/// The page currently receiving draw operations.
struct OpenPage {
    page: Page,
    system: Option<NumberSystem>,
    running_text: bool,
}

/// State of one layout pass.
pub(super) struct Flow<'r> {
    pub(super) doc: &'r Document,
    pub(super) geometry: PageGeometry,
    include_cover: bool,
    text_measurer: &'r dyn TextMeasurer,
    images: &'r dyn ImageMeasurer,
    cancel: &'r dyn CancelToken,
    pub(super) counters: Counters,
    pages: Vec<Page>,
    current: Option<OpenPage>,
    pub(super) y: f32,
    warnings: Vec<ImageError>,
    pub(super) stats: LayoutStats,
    spans: Vec<SectionSpan>,
}

impl<'r> Flow<'r> {
    fn run(&mut self, parsed: &[ParsedSection]) -> Result<()> {
        let doc = self.doc;

        if self.include_cover {
            if let Some(src) = doc.info.cover_image.as_deref() {
                self.cover_page("cover", src)?;
            }
        }

        self.title_page()?;

        if doc.settings.table_of_contents.enabled {
            self.toc_pass()?;
        }

        for (section, blocks) in doc.sections.iter().zip(parsed) {
            self.layout_section(section, blocks)?;
        }

        if self.include_cover {
            if let Some(src) = doc.info.back_cover_image.as_deref() {
                self.cover_page("back-cover", src)?;
            }
        }

        self.finish_page();
        Ok(())
    }

    fn into_result(self) -> LayoutResult {
        LayoutResult {
            pages: self.pages,
            warnings: self.warnings,
            stats: self.stats,
            spans: self.spans,
        }
    }

    /// Close the open page and start a new one.
    ///
    /// This is the only place a page boundary happens, so it is also where
    /// cancellation is observed.
    pub(super) fn begin_page(
        &mut self,
        system: Option<NumberSystem>,
        running_text: bool,
    ) -> Result<()> {
        self.finish_page();
        if self.cancel.is_cancelled() {
            log::debug!("layout cancelled after {} pages", self.pages.len());
            return Err(Error::Cancelled {
                pages: std::mem::take(&mut self.pages),
            });
        }
        self.current = Some(OpenPage {
            page: Page::new(self.pages.len()),
            system,
            running_text,
        });
        self.y = self.geometry.margin_top;
        Ok(())
    }

    /// Page break inside a body: same numbering system, cursor to the top.
    fn break_page(&mut self) -> Result<()> {
        let system = self.current.as_ref().and_then(|open| open.system);
        log::debug!("page break at y={:.1}mm", self.y);
        self.begin_page(system, true)
    }

    /// Break if the cursor is past the bottom limit less `reserve_mm`.
    pub(super) fn ensure_room(&mut self, reserve_mm: f32) -> Result<()> {
        if self.y > self.geometry.bottom_limit() - reserve_mm {
            self.break_page()?;
        }
        Ok(())
    }

    /// Stamp the open page and move it to the output.
    fn finish_page(&mut self) {
        let Some(open) = self.current.take() else {
            return;
        };
        let mut page = open.page;
        if let Some(system) = open.system {
            let value = self.counters.take(system);
            let text = self.label_text(system, value);
            if self.stamp_visible(system) {
                page.push(DrawOp::PageNumber(self.stamp(&text)));
            }
            if open.running_text {
                let settings = &self.doc.settings;
                self.running_text(&mut page, &settings.header, FontRole::Header);
                self.running_text(&mut page, &settings.footer, FontRole::Footer);
            }
            page.label = Some(PageLabel {
                system,
                value,
                text,
            });
        }
        self.stats.count_page(open.system);
        self.pages.push(page);
    }

    pub(super) fn label_text(&self, system: NumberSystem, value: u32) -> String {
        system.format(value, self.doc.settings.page_numbering.style)
    }

    fn stamp_visible(&self, system: NumberSystem) -> bool {
        let numbering = &self.doc.settings.page_numbering;
        let hidden_style = system == NumberSystem::Arabic && numbering.style == NumberStyle::None;
        numbering.enabled && !hidden_style
    }

    fn stamp(&self, text: &str) -> PageNumberOp {
        let numbering = &self.doc.settings.page_numbering;
        let font = self.doc.settings.font(FontRole::Footer);
        let g = &self.geometry;
        let y = match numbering.position {
            NumberPosition::Top => g.margin_top - NUMBER_TOP_OFFSET_MM,
            NumberPosition::Bottom => g.page_height - g.margin_bottom / 2.0,
        };
        PageNumberOp {
            x: g.anchor_x(numbering.alignment),
            y,
            text: text.to_string(),
            alignment: numbering.alignment,
            font_family: font.family.clone(),
            size_pt: font.size_pt,
        }
    }

    fn running_text(&self, page: &mut Page, running: &RunningText, role: FontRole) {
        if !running.enabled || running.text.is_empty() {
            return;
        }
        let font = self.doc.settings.font(role);
        let even = (page.index + 1) % 2 == 0;
        let alignment = if running.alternate_even_odd && even {
            font.alignment.mirrored()
        } else {
            font.alignment
        };
        let g = &self.geometry;
        let (y, text_role) = match role {
            FontRole::Header => (g.margin_top / 2.0, TextRole::Header),
            _ => (g.page_height - g.margin_bottom / 3.0, TextRole::Footer),
        };
        let op = TextOp::new(running.text.as_str(), g.anchor_x(alignment), y, font, text_role)
            .aligned(alignment);
        page.push(DrawOp::Text(op));
    }

    pub(super) fn draw(&mut self, op: DrawOp) {
        if let Some(open) = self.current.as_mut() {
            open.page.push(op);
        }
    }

    fn cover_page(&mut self, id: &str, src: &str) -> Result<()> {
        let size = match self.measure(id, src) {
            Some(size) => size,
            None => return Ok(()),
        };
        self.begin_page(None, false)?;
        let g = self.geometry;
        let scale = (g.page_width / size.width as f32).min(g.page_height / size.height as f32);
        let width = size.width as f32 * scale;
        let height = size.height as f32 * scale;
        self.draw(DrawOp::Image(ImageOp {
            image_id: id.to_string(),
            src: src.to_string(),
            x: (g.page_width - width) / 2.0,
            y: (g.page_height - height) / 2.0,
            width,
            height,
        }));
        self.stats.images_placed += 1;
        Ok(())
    }

    fn title_page(&mut self) -> Result<()> {
        self.begin_page(Some(NumberSystem::Roman), false)?;
        let doc = self.doc;
        let g = self.geometry;
        let center = g.anchor_x(TextAlignment::Center);
        if !doc.info.title.is_empty() {
            let font = doc.settings.font(FontRole::Title);
            let op = TextOp::new(
                doc.info.title.as_str(),
                center,
                g.margin_top + TITLE_PAGE_TITLE_MM,
                font,
                TextRole::Title,
            );
            self.draw(DrawOp::Text(op.aligned(TextAlignment::Center)));
        }
        if !doc.info.author.is_empty() {
            let font = doc.settings.font(FontRole::Subtitle);
            let op = TextOp::new(
                doc.info.author.as_str(),
                center,
                g.margin_top + TITLE_PAGE_AUTHOR_MM,
                font,
                TextRole::Author,
            );
            self.draw(DrawOp::Text(op.aligned(TextAlignment::Center)));
        }
        Ok(())
    }

    fn layout_section(&mut self, section: &Section, parsed: &ParsedSection) -> Result<()> {
        let doc = self.doc;
        let system = NumberSystem::for_kind(section.kind);
        self.begin_page(Some(system), true)?;

        let first_page = self.pages.len();
        let first_number = self.counters.current(system);
        log::debug!(
            "section {} starts on page {} ({:?} {})",
            section.id,
            first_page,
            system,
            first_number
        );

        let g = self.geometry;
        let title_font = doc.settings.font(FontRole::Subtitle);
        self.draw(DrawOp::Text(TextOp::new(
            section.title.as_str(),
            g.anchor_x(title_font.alignment),
            g.section_title_y(),
            title_font,
            TextRole::SectionTitle,
        )));
        self.y = g.section_body_start();

        self.layout_paragraphs(section, &parsed.body)?;
        self.layout_images(&section.images)?;

        let sub_size = title_font.size_pt * SUBSECTION_TITLE_SCALE;
        let mut subsections = Vec::with_capacity(section.subsections.len());
        for (sub, paragraphs) in section.subsections.iter().zip(&parsed.subsections) {
            self.ensure_room(SUBSECTION_RESERVE_MM)?;
            self.y += SUBSECTION_TITLE_GAP_MM;
            subsections.push(SubsectionStart {
                subsection_id: sub.id.clone(),
                number: self.counters.current(system),
            });
            let op = TextOp::new(
                sub.title.as_str(),
                g.margin_left,
                self.y,
                title_font,
                TextRole::SubsectionTitle,
            )
            .sized(sub_size)
            .aligned(TextAlignment::Left);
            self.draw(DrawOp::Text(op));
            self.y += SUBSECTION_BODY_GAP_MM;

            self.layout_paragraphs(section, paragraphs)?;
            self.layout_images(&sub.images)?;
        }

        let page_count = self.pages.len() + 1 - first_page;
        log::debug!("section {} used {} pages", section.id, page_count);
        self.spans.push(SectionSpan {
            section_id: section.id.clone(),
            system,
            first_number,
            first_label: self.label_text(system, first_number),
            first_page,
            page_count,
            subsections,
        });
        Ok(())
    }

    fn layout_paragraphs(&mut self, section: &Section, paragraphs: &[Vec<Block>]) -> Result<()> {
        let doc = self.doc;
        let font = doc.settings.font(FontRole::Paragraph);
        let advance = geometry::line_advance(font, section.line_spacing);
        let base_x = self.geometry.margin_left + section.indentation * SECTION_INDENT_MM;
        for blocks in paragraphs {
            for block in blocks {
                self.layout_block(block, font, advance, base_x)?;
            }
            self.y += geometry::paragraph_gap(font);
        }
        Ok(())
    }

    fn layout_block(
        &mut self,
        block: &Block,
        font: &FontSpec,
        advance: f32,
        base_x: f32,
    ) -> Result<()> {
        let indent_x = |indent: usize| base_x + indent as f32 * BLOCK_INDENT_MM;
        match block {
            Block::Heading {
                level,
                runs,
                indent,
            } => {
                let hint = font.size_pt * (1.0 + 7u8.saturating_sub(*level) as f32 * 0.1);
                let text = normalized(&runs_text(runs));
                self.draw_wrapped(
                    &text,
                    indent_x(*indent),
                    font,
                    hint,
                    TextRole::Heading,
                    advance,
                )
            }
            Block::Paragraph { runs, indent } => {
                let text = normalized(&runs_text(runs));
                self.draw_wrapped(
                    &text,
                    indent_x(*indent),
                    font,
                    font.size_pt,
                    TextRole::Body,
                    advance,
                )
            }
            Block::Blockquote { runs, indent } => {
                let text = normalized(&runs_text(runs));
                self.draw_wrapped(
                    &text,
                    indent_x(*indent),
                    font,
                    font.size_pt,
                    TextRole::Quote,
                    advance,
                )
            }
            Block::List { kind, items, .. } => {
                for (n, item) in items.iter().enumerate() {
                    let marker = match kind {
                        ListKind::Ordered => format!("{}. ", n + 1),
                        ListKind::Unordered => "• ".to_string(),
                    };
                    let text = normalized(&format!("{}{}", marker, runs_text(&item.runs)));
                    self.draw_wrapped(
                        &text,
                        indent_x(item.indent),
                        font,
                        font.size_pt,
                        TextRole::ListItem,
                        advance,
                    )?;
                }
                Ok(())
            }
            Block::Rule => {
                self.ensure_room(0.0)?;
                let length = self.geometry.content_width() - (base_x - self.geometry.margin_left);
                self.draw(DrawOp::Rule(RuleOp {
                    x: base_x,
                    y: self.y,
                    length: length.max(0.0),
                }));
                self.y += advance;
                Ok(())
            }
            Block::CodeBlock { text } => {
                let mono = FontSpec {
                    family: MONOSPACE_FAMILY.to_string(),
                    alignment: TextAlignment::Left,
                    ..font.clone()
                };
                for line in text.lines() {
                    if line.trim().is_empty() {
                        self.ensure_room(0.0)?;
                        self.y += advance;
                        continue;
                    }
                    self.draw_wrapped(line, base_x, &mono, mono.size_pt, TextRole::Code, advance)?;
                }
                Ok(())
            }
        }
    }

    /// Wrap `text` to the content width and draw each line, breaking pages as
    /// the cursor passes the bottom limit.
    fn draw_wrapped(
        &mut self,
        text: &str,
        x: f32,
        font: &FontSpec,
        size_hint: f32,
        role: TextRole,
        advance: f32,
    ) -> Result<()> {
        let lines = wrap_text(
            text,
            self.geometry.content_width(),
            self.text_measurer,
            font,
            font.size_pt,
        );
        for line in lines {
            self.ensure_room(0.0)?;
            let op = TextOp::new(line, x, self.y, font, role).sized(size_hint);
            self.draw(DrawOp::Text(op));
            self.y += advance;
            self.stats.text_lines += 1;
        }
        Ok(())
    }

    fn layout_images(&mut self, images: &[Image]) -> Result<()> {
        let doc = self.doc;
        let caption_font = doc.settings.font(FontRole::Paragraph);
        for image in images {
            let Some(size) = self.measure(&image.id, &image.src) else {
                continue;
            };
            self.ensure_room(IMAGE_RESERVE_MM)?;

            let g = self.geometry;
            let width = g.content_width() * image.width_percent as f32 / 100.0;
            let height = width * size.aspect();
            let x = match image.alignment {
                ImageAlignment::Left => g.margin_left,
                ImageAlignment::Center => (g.page_width - width) / 2.0,
                ImageAlignment::Right => g.page_width - g.margin_right - width,
            };
            self.draw(DrawOp::Image(ImageOp {
                image_id: image.id.clone(),
                src: image.src.clone(),
                x,
                y: self.y,
                width,
                height,
            }));
            self.stats.images_placed += 1;
            self.y += height + IMAGE_GAP_MM;

            if image.has_caption() {
                let op = TextOp::new(
                    image.caption.as_str(),
                    g.anchor_x(TextAlignment::Center),
                    self.y,
                    caption_font,
                    TextRole::Caption,
                )
                .sized(caption_font.size_pt * CAPTION_SCALE)
                .aligned(TextAlignment::Center);
                self.draw(DrawOp::Text(op));
                self.y += CAPTION_ADVANCE_MM;
            }
        }
        Ok(())
    }

    /// Measure an image, turning a failure into a warning.
    fn measure(&mut self, id: &str, src: &str) -> Option<ImageSize> {
        let outcome = self
            .images
            .measure(src)
            .map_err(|e| ImageError::new(id, e.reason))
            .and_then(|size| {
                if size.width == 0 || size.height == 0 {
                    Err(ImageError::new(id, "image has no pixels"))
                } else {
                    Ok(size)
                }
            });
        match outcome {
            Ok(size) => Some(size),
            Err(err) => {
                log::warn!("skipping image: {}", err);
                self.stats.images_skipped += 1;
                self.warnings.push(err);
                None
            }
        }
    }
}
