//! Layout options and cooperative cancellation.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::parser::MarkupOptions;

/// Where the table of contents takes its page numbers from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TocPageSource {
    /// Use each entry's stored `page_number` (normally the estimator's).
    #[default]
    Estimated,
    /// Run the flow engine once, then lay out again with the page numbers it
    /// actually produced. Changes the printed TOC numbers for documents where
    /// the estimate is off.
    Reconciled,
}

/// Options for the flow engine.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Markup parsing options
    pub markup: MarkupOptions,

    /// Parse section markup on the rayon pool before layout
    pub parallel: bool,

    /// TOC page number source
    pub toc_source: TocPageSource,

    /// Emit cover and back cover pages
    pub include_cover: bool,
}

impl LayoutOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the markup options.
    pub fn with_markup(mut self, markup: MarkupOptions) -> Self {
        self.markup = markup;
        self
    }

    /// Set the tab stop used for indentation levels.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.markup = self.markup.with_tab_stop(tab_stop);
        self
    }

    /// Set the TOC page number source.
    pub fn with_toc_source(mut self, source: TocPageSource) -> Self {
        self.toc_source = source;
        self
    }

    /// Use numbers from a completed layout pass in the TOC.
    pub fn reconciled(self) -> Self {
        self.with_toc_source(TocPageSource::Reconciled)
    }

    /// Enable or disable cover pages.
    pub fn with_covers(mut self, include: bool) -> Self {
        self.include_cover = include;
        self
    }

    /// Parse markup on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            markup: MarkupOptions::default(),
            parallel: true,
            toc_source: TocPageSource::Estimated,
            include_cover: true,
        }
    }
}

/// Cooperative cancellation, polled at every page break.
pub trait CancelToken: Send + Sync {
    fn is_cancelled(&self) -> bool;
}

/// A token that never fires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

impl CancelToken for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl CancelToken for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}
