//! JSON rendering for laid-out pages.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::layout::LayoutResult;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a layout result to JSON.
pub fn to_json(result: &LayoutResult, format: JsonFormat) -> Result<String> {
    serialize(result, format)
}

/// Convert any serializable value (estimates, parsed blocks) to JSON.
pub fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FlowEngine, ImageSizes};
    use crate::model::{Document, Section};

    fn result() -> LayoutResult {
        let doc = Document::new().section(Section::chapter("c1", "Opening").with_content("Hello"));
        FlowEngine::default().render(&doc, &ImageSizes::new()).unwrap()
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&result(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"section_id\": \"c1\""));
        assert!(json.contains("\"op\": \"page_number\""));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&result(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        let back: LayoutResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.pages.len(), 3);
    }
}
