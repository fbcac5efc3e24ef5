//! Page types: metadata and site discovery.

mod meta;
mod scan;

pub use meta::{PageMeta, src_uri_for};
pub use scan::{SitePage, extract_page, scan_site};
