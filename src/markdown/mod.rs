//! Markdown rendering.
//!
//! - [`convert`]: cleaned HTML tree → raw Markdown
//! - [`normalize`]: raw Markdown → canonical layout

mod convert;
mod normalize;

pub use convert::MarkdownConverter;
pub use normalize::{FenceTracker, normalize};

use crate::dom::Document;
use crate::pipeline::transform::link::PageAddress;

/// Render a document to normalized Markdown.
pub fn to_markdown(doc: &Document, address: &PageAddress) -> String {
    normalize(&MarkdownConverter::new(address).convert(doc))
}
