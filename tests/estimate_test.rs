//! Integration tests for the page estimator.

use bindery::layout::{estimate_report, PageBudget};
use bindery::{
    estimate, estimate_in_place, Document, DocumentSettings, Error, Image, Section, SectionKind,
    Subsection,
};
use proptest::prelude::*;

fn budget() -> PageBudget {
    PageBudget::from_settings(&DocumentSettings::default()).unwrap()
}

fn two_chapters(first_len: usize) -> Document {
    Document::new()
        .section(Section::chapter("c1", "One").with_content("a".repeat(first_len)))
        .section(Section::chapter("c2", "Two"))
}

#[test]
fn test_exactly_one_page_of_characters() {
    let cpp = budget().chars_per_page;
    let doc = estimate(&two_chapters(cpp)).unwrap();
    // one content page + heading page
    assert_eq!(doc.sections[1].page_number, Some(3));
}

#[test]
fn test_one_character_more_needs_a_second_page() {
    let cpp = budget().chars_per_page;
    let doc = estimate(&two_chapters(cpp + 1)).unwrap();
    assert_eq!(doc.sections[1].page_number, Some(4));
}

#[test]
fn test_empty_section_costs_the_heading_page() {
    let doc = estimate(&two_chapters(0)).unwrap();
    assert_eq!(doc.sections[0].page_number, Some(1));
    assert_eq!(doc.sections[1].page_number, Some(2));
}

#[test]
fn test_images_two_per_page() {
    let mut section = Section::chapter("c1", "One");
    for i in 0..3 {
        section = section.with_image(Image::new(format!("i{}", i), "x.png"));
    }
    let doc = Document::new()
        .section(section)
        .section(Section::chapter("c2", "Two"));
    let report = estimate_report(&doc).unwrap();
    assert_eq!(report[0].image_pages, 2);
    assert_eq!(report[1].page_number, 4);
}

#[test]
fn test_subsection_images_are_not_budgeted() {
    let doc = Document::new()
        .section(
            Section::chapter("c1", "One").with_subsection(
                Subsection::new("s1", "Sub").with_image(Image::new("i", "x.png")),
            ),
        )
        .section(Section::chapter("c2", "Two"));
    let doc = estimate(&doc).unwrap();
    assert_eq!(doc.sections[0].subsections[0].page_number, Some(2));
    assert_eq!(doc.sections[1].page_number, Some(2));
}

#[test]
fn test_front_and_main_matter_counted_separately() {
    let mut doc = Document::new()
        .section(Section::front_matter("f1", "Foreword"))
        .section(Section::front_matter("f2", "Preface"))
        .section(Section::chapter("c1", "One"))
        .section(Section::back_matter("b1", "Afterword"));
    estimate_in_place(&mut doc).unwrap();
    let numbers: Vec<_> = doc.sections.iter().map(|s| s.page_number.unwrap()).collect();
    assert_eq!(numbers, vec![1, 2, 1, 2]);
}

#[test]
fn test_invalid_settings_rejected_before_estimating() {
    let mut doc = two_chapters(10);
    doc.settings.margins.left = -1.0;
    assert!(matches!(estimate(&doc), Err(Error::InvalidSettings(_))));

    let mut doc = two_chapters(10);
    doc.settings.fonts.paragraph.size_pt = 0.0;
    assert!(matches!(estimate(&doc), Err(Error::InvalidSettings(_))));
}

#[test]
fn test_invalid_image_width_rejected() {
    let image = Image::new("i", "x.png").with_width_percent(5);
    let doc = Document::new().section(Section::chapter("c1", "One").with_image(image));
    match estimate(&doc) {
        Err(Error::InvalidSection { section, .. }) => assert_eq!(section, "c1"),
        other => panic!("expected invalid section, got {:?}", other.map(|_| ())),
    }
}

fn kind_strategy() -> impl Strategy<Value = SectionKind> {
    prop_oneof![
        Just(SectionKind::FrontMatter),
        Just(SectionKind::Chapter),
        Just(SectionKind::BackMatter),
    ]
}

fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::vec((kind_strategy(), 0usize..5000, 0usize..5, 0usize..3), 0..12).prop_map(
        |specs| {
            let mut doc = Document::new();
            for (i, (kind, len, images, subs)) in specs.into_iter().enumerate() {
                let mut section = Section::new(format!("s{}", i), format!("Section {}", i), kind)
                    .with_content("x".repeat(len));
                for j in 0..images {
                    section = section.with_image(Image::new(format!("s{}-i{}", i, j), "x.png"));
                }
                for j in 0..subs {
                    let sub = Subsection::new(format!("s{}-{}", i, j), "Sub")
                        .with_content("y".repeat(len / 2));
                    section = section.with_subsection(sub);
                }
                doc.add_section(section);
            }
            doc
        },
    )
}

proptest! {
    #[test]
    fn prop_estimate_is_idempotent(doc in document_strategy()) {
        let once = estimate(&doc).unwrap();
        let twice = estimate(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_numbers_monotonic_per_system(doc in document_strategy()) {
        let doc = estimate(&doc).unwrap();
        let mut last_roman = 0;
        let mut last_arabic = 0;
        for section in &doc.sections {
            let number = section.page_number.unwrap();
            let last = if section.kind == SectionKind::FrontMatter {
                &mut last_roman
            } else {
                &mut last_arabic
            };
            prop_assert!(number >= *last);
            *last = number;
            for sub in &section.subsections {
                let sub_number = sub.page_number.unwrap();
                prop_assert!(sub_number >= *last);
                *last = sub_number;
            }
        }
    }
}
