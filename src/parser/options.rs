//! Markup parsing options.

/// Options for the block parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Columns of leading whitespace per indentation level
    pub tab_stop: usize,

    /// Deepest heading level recognized; deeper `#` runs are paragraphs
    pub max_heading_level: u8,
}

impl MarkupOptions {
    /// Create new markup options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tab stop width. Zero is treated as one column.
    pub fn with_tab_stop(mut self, columns: usize) -> Self {
        self.tab_stop = columns.max(1);
        self
    }

    /// Set the maximum heading level (1-6).
    pub fn with_max_heading(mut self, level: u8) -> Self {
        self.max_heading_level = level.clamp(1, 6);
        self
    }

    /// Indentation level of a raw line.
    ///
    /// Spaces count one column, tabs count a full tab stop.
    pub fn indent_level(&self, line: &str) -> usize {
        let tab_stop = self.tab_stop.max(1);
        let width: usize = line
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(|c| if c == '\t' { tab_stop } else { 1 })
            .sum();
        width / tab_stop
    }
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            tab_stop: 4,
            max_heading_level: 6,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markup_options_builder() {
        let options = MarkupOptions::new().with_tab_stop(2).with_max_heading(9);
        assert_eq!(options.tab_stop, 2);
        assert_eq!(options.max_heading_level, 6);
        assert_eq!(MarkupOptions::new().with_tab_stop(0).tab_stop, 1);
    }

    #[test]
    fn test_indent_level() {
        let options = MarkupOptions::new();
        assert_eq!(options.indent_level("text"), 0);
        assert_eq!(options.indent_level("   text"), 0);
        assert_eq!(options.indent_level("    text"), 1);
        assert_eq!(options.indent_level("\t\ttext"), 2);

        let two = MarkupOptions::new().with_tab_stop(2);
        assert_eq!(two.indent_level("  - b"), 1);
        assert_eq!(two.indent_level("     x"), 2);
    }
}
