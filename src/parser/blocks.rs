//! Block markup parser.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use super::{lex, MarkupOptions};
use crate::model::{Block, ListItem, ListKind};

fn heading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#+)\s+(.+)$").expect("heading pattern"))
}

fn ordered_item_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s+(.+)$").expect("ordered item pattern"))
}

fn fence_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(`{3,}|~{3,})").expect("fence pattern"))
}

/// Parse markup text into blocks with default options.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    parse_blocks_with(text, &MarkupOptions::default())
}

/// Parse markup text into blocks.
pub fn parse_blocks_with(text: &str, options: &MarkupOptions) -> Vec<Block> {
    BlockParser::new(options.clone()).parse(text)
}

/// Split text into blank-line separated paragraphs.
///
/// A blank line inside a fenced code block does not end the paragraph, so a
/// fence always reaches the block parser whole. Whitespace-only chunks are
/// dropped.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut fence: Option<String> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(marker) = fence.as_deref() {
            if closes_fence(marker, trimmed) {
                fence = None;
            }
            current.push(line);
            continue;
        }
        if line.is_empty() {
            flush_paragraph(&mut paragraphs, &mut current);
            continue;
        }
        if let Some(caps) = fence_regex().captures(trimmed) {
            fence = Some(caps[1].to_string());
        }
        current.push(line);
    }
    flush_paragraph(&mut paragraphs, &mut current);
    paragraphs
}

fn flush_paragraph(paragraphs: &mut Vec<String>, lines: &mut Vec<&str>) {
    let paragraph = lines.join("\n");
    lines.clear();
    if !paragraph.trim().is_empty() {
        paragraphs.push(paragraph);
    }
}

/// A closing fence is a run of the opening character at least as long as the
/// opening run, with nothing after it.
fn closes_fence(marker: &str, trimmed: &str) -> bool {
    let Some(ch) = marker.chars().next() else {
        return false;
    };
    let run = trimmed.chars().take_while(|c| *c == ch).count();
    run >= marker.chars().count() && trimmed[run * ch.len_utf8()..].trim().is_empty()
}

/// Strip all markup and return the text a reader would see.
///
/// Blocks are separated by newlines; the result is NFC-normalized so that
/// width measurement sees composed characters.
pub fn strip_markup(text: &str) -> String {
    parse_blocks(text)
        .iter()
        .map(Block::plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .nfc()
        .collect()
}

/// List run currently being collected.
#[derive(Debug)]
struct OpenList {
    kind: ListKind,
    indent: usize,
    items: Vec<ListItem>,
}

/// Open fenced code block.
#[derive(Debug)]
struct OpenFence {
    marker: String,
    lines: Vec<String>,
}

/// Single-pass line state machine turning text into [`Block`]s.
#[derive(Debug)]
pub struct BlockParser {
    options: MarkupOptions,
    blocks: Vec<Block>,
    list: Option<OpenList>,
    fence: Option<OpenFence>,
}

impl BlockParser {
    /// Create a parser.
    pub fn new(options: MarkupOptions) -> Self {
        Self {
            options,
            blocks: Vec::new(),
            list: None,
            fence: None,
        }
    }

    /// Parse a whole text and return its blocks.
    pub fn parse(mut self, text: &str) -> Vec<Block> {
        for line in text.lines() {
            self.push_line(line);
        }
        self.finish()
    }

    /// Feed one raw line.
    pub fn push_line(&mut self, raw: &str) {
        let trimmed = raw.trim();

        if let Some(fence) = self.fence.as_mut() {
            if closes_fence(&fence.marker, trimmed) {
                self.close_fence();
            } else {
                fence.lines.push(raw.to_string());
            }
            return;
        }

        if trimmed.is_empty() {
            self.close_list();
            return;
        }

        let indent = self.options.indent_level(raw);

        if let Some(caps) = fence_regex().captures(trimmed) {
            self.close_list();
            let marker = caps[1].to_string();
            self.fence = Some(OpenFence {
                marker,
                lines: Vec::new(),
            });
            return;
        }

        if matches!(trimmed, "---" | "***" | "___") {
            self.close_list();
            self.blocks.push(Block::Rule);
            return;
        }

        if let Some(caps) = heading_regex().captures(trimmed) {
            let level = caps[1].len();
            if level <= usize::from(self.options.max_heading_level) {
                self.close_list();
                self.blocks.push(Block::Heading {
                    level: level as u8,
                    runs: lex(&caps[2]),
                    indent,
                });
                return;
            }
        }

        if let Some(caps) = ordered_item_regex().captures(trimmed) {
            self.push_item(ListKind::Ordered, indent, &caps[1]);
            return;
        }

        if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            self.push_item(ListKind::Unordered, indent, rest);
            return;
        }

        if let Some(rest) = trimmed.strip_prefix("> ") {
            self.close_list();
            self.blocks.push(Block::Blockquote {
                runs: lex(rest),
                indent,
            });
            return;
        }

        self.close_list();
        self.blocks.push(Block::Paragraph {
            runs: lex(trimmed),
            indent,
        });
    }

    /// Flush open state and return the blocks.
    pub fn finish(mut self) -> Vec<Block> {
        self.close_list();
        if self.fence.is_some() {
            self.close_fence();
        }
        self.blocks
    }

    fn push_item(&mut self, kind: ListKind, indent: usize, text: &str) {
        if self.list.as_ref().is_some_and(|list| list.kind != kind) {
            self.close_list();
        }
        let list = self.list.get_or_insert_with(|| {
            log::trace!("open {:?} list at indent {}", kind, indent);
            OpenList {
                kind,
                indent,
                items: Vec::new(),
            }
        });
        list.items.push(ListItem {
            ordered: kind == ListKind::Ordered,
            indent,
            runs: lex(text),
        });
    }

    fn close_list(&mut self) {
        if let Some(list) = self.list.take() {
            log::trace!("close {:?} list with {} items", list.kind, list.items.len());
            self.blocks.push(Block::List {
                kind: list.kind,
                indent: list.indent,
                items: list.items,
            });
        }
    }

    fn close_fence(&mut self) {
        if let Some(fence) = self.fence.take() {
            self.blocks.push(Block::CodeBlock {
                text: fence.lines.join("\n"),
            });
        }
    }
}
