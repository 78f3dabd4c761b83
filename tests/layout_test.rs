//! Integration tests for the flow engine.

use std::sync::atomic::{AtomicUsize, Ordering};

use bindery::layout::{line_advance, PageGeometry, TextRole};
use bindery::{
    estimate, CancelToken, Document, DocumentSettings, Error, FlowEngine, FontRole, FontSpec,
    Image, ImageSizes, LayoutOptions, NumberSystem, Section, Subsection, TextMeasurer,
    TocPageSource,
};

/// Every word is 100 mm wide, so no two words share a line.
struct WordPerLine;

impl TextMeasurer for WordPerLine {
    fn text_width_mm(&self, text: &str, _font: &FontSpec, _size_pt: f32) -> f32 {
        text.split_whitespace().count() as f32 * 100.0
    }
}

/// Fires after `limit` page breaks.
struct CancelAfter {
    limit: usize,
    calls: AtomicUsize,
}

impl CancelToken for CancelAfter {
    fn is_cancelled(&self) -> bool {
        self.calls.fetch_add(1, Ordering::Relaxed) >= self.limit
    }
}

fn engine(options: LayoutOptions) -> FlowEngine<'static> {
    FlowEngine::new(options).with_text_measurer(&WordPerLine)
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

/// Lines that fit on a section's opening page.
fn lines_per_first_page(settings: &DocumentSettings, line_spacing: f32) -> usize {
    let geometry = PageGeometry::from_settings(settings);
    let advance = line_advance(settings.font(FontRole::Paragraph), line_spacing);
    geometry.lines_fitting(geometry.section_body_start(), advance)
}

#[test]
fn test_one_line_over_a_page_spills_onto_a_second() {
    let settings = DocumentSettings::default();
    let lines = lines_per_first_page(&settings, 1.5);
    let doc = Document::with_settings(settings)
        .section(Section::chapter("c1", "Overflow").with_content(words(lines + 1)));

    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();

    let span = result.span("c1").unwrap();
    assert_eq!(span.page_count, 2);
    assert_eq!(span.system, NumberSystem::Arabic);

    let pages = result.section_pages("c1");
    assert_eq!(pages[0].body_line_count(), lines);
    assert_eq!(pages[1].body_line_count(), 1);
    assert_eq!(pages[0].stamp().unwrap().text, "1");
    assert_eq!(pages[1].stamp().unwrap().text, "2");
    // the spilled line restarts at the top margin
    let spilled = pages[1].text_ops().find(|t| t.role == TextRole::Body).unwrap();
    assert_eq!(spilled.y, PageGeometry::from_settings(&doc.settings).margin_top);
}

#[test]
fn test_exactly_a_page_stays_on_one_page() {
    let settings = DocumentSettings::default();
    let lines = lines_per_first_page(&settings, 1.5);
    let doc = Document::with_settings(settings)
        .section(Section::chapter("c1", "Full").with_content(words(lines)));
    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    assert_eq!(result.span("c1").unwrap().page_count, 1);
}

#[test]
fn test_zero_sections() {
    let result = engine(LayoutOptions::default())
        .render(&Document::new(), &ImageSizes::new())
        .unwrap();
    assert_eq!(result.page_count(), 2);
    assert_eq!(result.pages[1].texts_with_role(TextRole::TocEntry).count(), 0);

    let doc = Document::with_settings(DocumentSettings::default().with_toc(false));
    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    assert_eq!(result.page_count(), 1);
    assert_eq!(result.pages[0].stamp().unwrap().text, "i");
}

#[test]
fn test_empty_section_still_takes_a_page() {
    let doc = Document::new()
        .section(Section::chapter("c1", "Empty"))
        .section(Section::chapter("c2", "Next"));
    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    assert_eq!(result.span("c1").unwrap().page_count, 1);
    assert_eq!(result.span("c2").unwrap().first_number, 2);
}

#[test]
fn test_front_matter_continues_roman_after_toc() {
    let doc = Document::new()
        .section(Section::front_matter("p", "Preface").with_content(words(3)))
        .section(Section::chapter("c1", "One"));
    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    let labels: Vec<_> = result
        .pages
        .iter()
        .map(|p| p.label.as_ref().unwrap().text.as_str())
        .collect();
    assert_eq!(labels, vec!["i", "ii", "iii", "1"]);
    assert_eq!(result.stats.roman_pages, 3);
    assert_eq!(result.stats.arabic_pages, 1);
}

#[test]
fn test_start_from_applies_to_both_counters() {
    let settings = DocumentSettings::default().with_start_from(5).with_toc(false);
    let doc = Document::with_settings(settings).section(Section::chapter("c1", "One"));
    let result = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    assert_eq!(result.pages[0].stamp().unwrap().text, "v");
    assert_eq!(result.pages[1].stamp().unwrap().text, "5");
}

#[test]
fn test_failed_image_reserves_no_space() {
    let with_failed_image = Document::new().section(
        Section::chapter("c1", "One")
            .with_content("text")
            .with_image(Image::new("missing", "missing.png").with_caption("Lost"))
            .with_subsection(Subsection::new("s1", "After")),
    );
    let mut without_image = with_failed_image.clone();
    without_image.sections[0].images.clear();

    let engine = engine(LayoutOptions::default());
    let a = engine.render(&with_failed_image, &ImageSizes::new()).unwrap();
    let b = engine.render(&without_image, &ImageSizes::new()).unwrap();

    assert_eq!(a.warnings.len(), 1);
    assert_eq!(a.warnings[0].image_id, "missing");
    assert!(b.warnings.is_empty());

    let title_y = |r: &bindery::LayoutResult| {
        r.pages
            .iter()
            .flat_map(|p| p.texts_with_role(TextRole::SubsectionTitle))
            .map(|t| t.y)
            .next()
            .unwrap()
    };
    assert_eq!(title_y(&a), title_y(&b));
    assert_eq!(a.pages[2].texts_with_role(TextRole::Caption).count(), 0);
}

#[test]
fn test_image_and_caption_advance() {
    let doc = Document::new().section(
        Section::chapter("c1", "One")
            .with_image(
                Image::new("fig", "fig.png")
                    .with_width_percent(50)
                    .with_alignment(bindery::ImageAlignment::Right)
                    .with_caption("A figure"),
            )
            .with_subsection(Subsection::new("s1", "After")),
    );
    let sizes = ImageSizes::new().with("fig.png", 400, 300);
    let result = engine(LayoutOptions::default()).render(&doc, &sizes).unwrap();
    let page = &result.pages[2];
    let image = page.image_ops().next().unwrap();
    let geometry = PageGeometry::from_settings(&doc.settings);
    assert!((image.x - (geometry.page_width - geometry.margin_right - image.width)).abs() < 1e-3);
    assert!((image.height - image.width * 0.75).abs() < 1e-3);

    let caption = page.texts_with_role(TextRole::Caption).next().unwrap();
    assert!((caption.y - (image.y + image.height + 10.0)).abs() < 1e-3);
    assert!((caption.size_pt - 12.0 * 0.8).abs() < 1e-4);

    let sub = page.texts_with_role(TextRole::SubsectionTitle).next().unwrap();
    assert!((sub.y - (caption.y + 15.0 + 20.0)).abs() < 1e-3);
}

#[test]
fn test_cancellation_returns_partial_pages() {
    let doc = Document::new()
        .section(Section::chapter("c1", "One"))
        .section(Section::chapter("c2", "Two"));
    // title page and TOC page open, then the token fires
    let token = CancelAfter {
        limit: 2,
        calls: AtomicUsize::new(0),
    };
    let err = FlowEngine::new(LayoutOptions::default())
        .with_text_measurer(&WordPerLine)
        .with_cancel_token(&token)
        .render(&doc, &ImageSizes::new())
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled { .. }));
    let pages = err.into_partial_pages().unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].label.as_ref().unwrap().text, "ii");
}

#[test]
fn test_validation_runs_before_layout() {
    let mut doc = Document::new().section(Section::chapter("c1", "One"));
    doc.sections[0].line_spacing = 0.5;
    let err = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidSection { .. }));
}

#[test]
fn test_reconciled_toc_uses_laid_out_numbers() {
    // The estimator budgets a heading page on top of the content page; the
    // flow engine fits the one-word chapter on a single page.
    let doc = Document::new()
        .section(Section::chapter("c1", "One").with_content("word"))
        .section(Section::chapter("c2", "Two"));
    let doc = estimate(&doc).unwrap();
    assert_eq!(doc.sections[1].page_number, Some(3));

    let toc_numbers = |source: TocPageSource| -> Vec<String> {
        let result = engine(LayoutOptions::new().with_toc_source(source))
            .render(&doc, &ImageSizes::new())
            .unwrap();
        result.pages[1]
            .texts_with_role(TextRole::TocNumber)
            .map(|t| t.text.clone())
            .collect()
    };

    assert_eq!(toc_numbers(TocPageSource::Estimated), vec!["1", "3"]);
    assert_eq!(toc_numbers(TocPageSource::Reconciled), vec!["1", "2"]);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let mut doc = Document::new();
    for i in 0..8 {
        doc.add_section(
            Section::chapter(format!("c{}", i), format!("Chapter {}", i))
                .with_content(format!("# Part\n\n{}\n\n- a\n- b", words(i * 7))),
        );
    }
    let parallel = engine(LayoutOptions::default())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    let sequential = engine(LayoutOptions::new().sequential())
        .render(&doc, &ImageSizes::new())
        .unwrap();
    assert_eq!(parallel.pages, sequential.pages);
    assert_eq!(parallel.spans, sequential.spans);
}
