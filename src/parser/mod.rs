//! Lightweight markup parsing.
//!
//! Author text goes through two stages: [`parse_blocks`] groups lines into
//! headings, paragraphs, lists, quotes, rules and fenced code, and [`lex`]
//! splits each text run into styled [`InlineRun`](crate::model::InlineRun)s.
//! Neither stage can fail: anything unrecognized degrades to plain text.

mod blocks;
mod inline;
mod options;

pub use blocks::{parse_blocks, parse_blocks_with, split_paragraphs, strip_markup, BlockParser};
pub use inline::{lex, lex_with_state, InlineState};
pub use options::MarkupOptions;
