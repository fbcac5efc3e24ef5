//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`route`]: URL utilities (`is_external_link`, `split_path_suffix`, `markdown_sibling`)

pub mod route;
