//! Plain-text proof of laid-out pages.

use std::fmt::Write;

use crate::layout::{DrawOp, LayoutResult, Page, TextRole};

/// Render a readable proof: one block per page with its label and every
/// drawn line in paint order.
pub fn to_text(result: &LayoutResult) -> String {
    let mut out = String::new();
    for page in &result.pages {
        write_page(&mut out, page);
    }
    for warning in &result.warnings {
        let _ = writeln!(out, "warning: {}", warning);
    }
    out
}

fn write_page(out: &mut String, page: &Page) {
    let label = page
        .label
        .as_ref()
        .map(|l| l.text.as_str())
        .unwrap_or("unnumbered");
    let _ = writeln!(out, "--- page {} [{}] ---", page.index + 1, label);

    let mut ops = page.ops.iter().peekable();
    while let Some(op) = ops.next() {
        match op {
            DrawOp::Text(text) => {
                let line = match text.role {
                    TextRole::Title | TextRole::SectionTitle | TextRole::TocHeading => {
                        format!("# {}", text.text)
                    }
                    TextRole::SubsectionTitle => format!("## {}", text.text),
                    TextRole::Quote => format!("> {}", text.text),
                    TextRole::Code => format!("    {}", text.text),
                    TextRole::Caption => format!("({})", text.text),
                    TextRole::Header | TextRole::Footer => format!("[{}]", text.text),
                    TextRole::TocEntry => match ops.peek() {
                        Some(DrawOp::Text(number)) if number.role == TextRole::TocNumber => {
                            let line = format!("{} .... {}", text.text, number.text);
                            ops.next();
                            line
                        }
                        _ => text.text.clone(),
                    },
                    _ => text.text.clone(),
                };
                let _ = writeln!(out, "{}", line);
            }
            DrawOp::Image(image) => {
                let _ = writeln!(
                    out,
                    "[image {} {:.1}x{:.1}mm]",
                    image.image_id, image.width, image.height
                );
            }
            DrawOp::Rule(_) => {
                let _ = writeln!(out, "----");
            }
            DrawOp::PageNumber(number) => {
                let _ = writeln!(out, "{:>40}", number.text);
            }
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FlowEngine, ImageSizes};
    use crate::model::{BookInfo, Document, Section};

    #[test]
    fn test_proof_lists_pages() {
        let mut doc = Document::new()
            .section(Section::chapter("c1", "Opening").with_content("> quoted\n\n---"));
        doc.info = BookInfo::new("A Book", "An Author");
        let result = FlowEngine::default().render(&doc, &ImageSizes::new()).unwrap();
        let text = to_text(&result);
        assert!(text.contains("--- page 1 [i] ---"));
        assert!(text.contains("# A Book"));
        assert!(text.contains("1. Opening .... 1"));
        assert!(text.contains("> quoted"));
        assert!(text.contains("----\n"));
        assert!(text.contains("--- page 3 [1] ---"));
    }
}
