//! Per-page HTML transforms.
//!
//! # Modules
//!
//! - `clean`: Removes site chrome and flattens code markup (Document → Document)
//! - `source`: Folds line-number/code tables into `<details>` blocks
//! - `link`: Classifies and resolves hrefs against the page address

mod clean;
pub mod link;
mod source;

pub use clean::clean;
pub use link::{PageAddress, resolve};
pub use source::{SOURCE_SUMMARY, fold_source_tables};
