//! Parsed markup: block elements and inline styled runs.

use serde::{Deserialize, Serialize};

/// A block element produced by the block parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// `#`..`######` heading
    Heading {
        /// Heading level (1-6)
        level: u8,
        /// Lexed heading text
        runs: Vec<InlineRun>,
        /// Indentation level of the source line
        indent: usize,
    },

    /// A run of plain text
    Paragraph {
        /// Lexed text
        runs: Vec<InlineRun>,
        /// Indentation level of the source line
        indent: usize,
    },

    /// Consecutive list items of one kind
    List {
        /// Ordered or unordered
        kind: ListKind,
        /// Indentation level of the first item of the run
        indent: usize,
        /// Items in source order
        items: Vec<ListItem>,
    },

    /// `> ` quoted line
    Blockquote {
        /// Lexed quote text
        runs: Vec<InlineRun>,
        /// Indentation level of the source line
        indent: usize,
    },

    /// Horizontal rule (`---`, `***`, `___`)
    Rule,

    /// Fenced code, kept verbatim
    CodeBlock {
        /// Raw lines joined with `\n`
        text: String,
    },
}

impl Block {
    /// Get the text a reader would see, with all markup removed.
    ///
    /// List items are joined with newlines; rules have no text.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { runs, .. }
            | Block::Paragraph { runs, .. }
            | Block::Blockquote { runs, .. } => runs_text(runs),
            Block::List { items, .. } => items
                .iter()
                .map(|item| runs_text(&item.runs))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Rule => String::new(),
            Block::CodeBlock { text } => text.clone(),
        }
    }

    /// Indentation level of the block (0 for rules and code).
    pub fn indent(&self) -> usize {
        match self {
            Block::Heading { indent, .. }
            | Block::Paragraph { indent, .. }
            | Block::List { indent, .. }
            | Block::Blockquote { indent, .. } => *indent,
            Block::Rule | Block::CodeBlock { .. } => 0,
        }
    }

    /// Check if this block is a heading.
    pub fn is_heading(&self) -> bool {
        matches!(self, Block::Heading { .. })
    }

    /// Check if this block is a list.
    pub fn is_list(&self) -> bool {
        matches!(self, Block::List { .. })
    }
}

/// Kind of list a [`Block::List`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// `1.` numbered items
    Ordered,
    /// `-` / `*` bulleted items
    Unordered,
}

/// A single list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Whether the item came from a numbered marker
    pub ordered: bool,
    /// Indentation level of the item's own line
    pub indent: usize,
    /// Lexed item text
    pub runs: Vec<InlineRun>,
}

/// An inline run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "style", content = "text", rename_all = "snake_case")]
pub enum InlineRun {
    /// Unstyled text
    Plain(String),
    /// `**bold**` / `__bold__`
    Bold(String),
    /// `*italic*` / `_italic_`
    Italic(String),
    /// Bold and italic at once
    BoldItalic(String),
    /// `~~struck~~`
    Strikethrough(String),
    /// `` `code` ``
    Code(String),
    /// `[text](href)`
    Link {
        /// Visible text
        text: String,
        /// Target
        href: String,
    },
}

impl InlineRun {
    /// Visible text of the run.
    pub fn text(&self) -> &str {
        match self {
            InlineRun::Plain(t)
            | InlineRun::Bold(t)
            | InlineRun::Italic(t)
            | InlineRun::BoldItalic(t)
            | InlineRun::Strikethrough(t)
            | InlineRun::Code(t) => t,
            InlineRun::Link { text, .. } => text,
        }
    }

    /// Check if the run carries no text.
    pub fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Check if any styling is applied.
    pub fn is_styled(&self) -> bool {
        !matches!(self, InlineRun::Plain(_))
    }
}

/// Concatenate the visible text of a run sequence.
pub(crate) fn runs_text(runs: &[InlineRun]) -> String {
    runs.iter().map(InlineRun::text).collect()
}
