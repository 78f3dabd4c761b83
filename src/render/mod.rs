//! Output of laid-out pages.
//!
//! The flow engine produces positioned draw operations; these functions
//! serialize them for a PDF writer or a person proofreading the layout.

mod json;
mod text;

pub use json::{serialize, to_json, JsonFormat};
pub use text::to_text;
