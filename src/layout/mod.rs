//! Page estimation and pagination.
//!
//! Two independent ways of counting pages live here:
//!
//! - [`estimate`] derives page numbers from character counts alone, for
//!   displaying a table of contents before anything is laid out.
//! - [`FlowEngine`] wraps every line against the content box and is the
//!   authoritative source of page breaks and numbers.
//!
//! The two are not expected to agree. [`TocPageSource::Reconciled`] makes the
//! engine print its own numbers in the table of contents instead.

#[cfg(feature = "decode")]
mod decode;
mod engine;
mod estimate;
mod geometry;
mod measure;
#[cfg(feature = "async")]
mod nonblocking;
mod numbering;
mod options;
mod page;
mod result;
mod toc;
mod validate;

#[cfg(feature = "decode")]
pub use decode::DecodingMeasurer;
pub use engine::FlowEngine;
pub use estimate::{
    estimate, estimate_in_place, estimate_report, PageBudget, SectionEstimate, SubsectionEstimate,
};
pub use geometry::{line_advance, paragraph_gap, PageGeometry};
pub use measure::{
    wrap_text, HeuristicTextMeasurer, ImageMeasurer, ImageSize, ImageSizes, TextMeasurer,
};
#[cfg(feature = "async")]
pub use nonblocking::{image_sources, render_async, AsyncImageMeasurer, TokioFileMeasurer};
pub use numbering::{romanize, Counters, NumberSystem, PageLabel};
pub use options::{CancelToken, LayoutOptions, NeverCancel, TocPageSource};
pub use page::{DrawOp, ImageOp, Page, PageNumberOp, RuleOp, TextOp, TextRole};
pub use result::{LayoutResult, LayoutStats, SectionSpan, SubsectionStart};
pub use validate::validate;
