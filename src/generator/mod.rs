//! Corpus aggregation.
//!
//! - **Collector**: two-phase protocol driving the page transformer
//! - **llms**: index (`llms.txt`) and full-text (`llms-full.txt`) documents
//!
//! Sections come out in configuration order; pages inside a section in the
//! order the host processed them.

mod collector;
mod llms;

pub use collector::Collector;
pub use llms::{BuildReport, SectionBuffer, SiteHeader, TransformedPage, aggregate, write_outputs};
