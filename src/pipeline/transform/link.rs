//! Link resolution against the published corpus.
//!
//! Every `href` found in a page is rewritten so it resolves correctly from
//! the Markdown corpus, whatever addressing scheme the HTML used.
//!
//! # Link Resolution
//!
//! Links are resolved based on their syntax using [`LinkKind`]:
//!
//! | LinkKind   | Example                | Result                                   |
//! |------------|------------------------|------------------------------------------|
//! | `Anchor`   | `#section`             | Preserved as-is                          |
//! | `External` | `https://...`, `mailto:` | Preserved as-is                        |
//! | `SiteRoot` | `/en/0.1.34/page1/`    | Absolute `.md` URL if under corpus root  |
//! | `SiteRoot` | `/abs1/`               | Preserved as-is (foreign)                |
//! | `Relative` | `../page1/`            | Joined with page dir, absolute `.md` URL |
//!
//! Internal targets are canonicalized to their Markdown sibling: directory
//! URLs get `index.md`, `.html` becomes `.md`, other extensions are kept.

use percent_encoding::percent_decode_str;
use url::Url;

use crate::core::{LinkClass, LinkKind};
use crate::utils::path::route::{markdown_sibling, segment_extension, split_path_suffix};

// =============================================================================
// Page Address
// =============================================================================

/// Position of a page within the published site: the frame every link in
/// the page is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAddress {
    /// Site root URL, always ending in `/`.
    base: Url,
    /// Page directory relative to `base`, empty or ending in `/`.
    current_dir: String,
}

impl PageAddress {
    /// Create from the site base URL and the page's directory.
    ///
    /// A missing trailing slash on either is added.
    pub fn new(base_uri: &str, current_dir: &str) -> Result<Self, url::ParseError> {
        Ok(Self::from_url(Url::parse(base_uri)?, current_dir))
    }

    /// Create from an already-parsed base URL.
    pub fn from_url(mut base: Url, current_dir: &str) -> Self {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            base,
            current_dir: normalize_dir(current_dir),
        }
    }

    /// Site root URL.
    #[inline]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Page directory relative to the site root (empty or ending in `/`).
    #[inline]
    pub fn current_dir(&self) -> &str {
        &self.current_dir
    }

    /// Absolute URL of the page's directory.
    fn dir_url(&self) -> Result<Url, url::ParseError> {
        self.base.join(&self.current_dir)
    }

    /// Classify an href within this corpus.
    pub fn classify(&self, href: &str) -> LinkClass {
        match LinkKind::parse(href) {
            LinkKind::Anchor(_) => LinkClass::Anchor,
            LinkKind::External(_) => LinkClass::ExternalScheme,
            LinkKind::SiteRoot(path) if self.is_corpus_path(path) => LinkClass::Internal,
            LinkKind::SiteRoot(_) => LinkClass::AbsoluteForeign,
            // An empty href points at the page itself
            LinkKind::Relative("") => LinkClass::Anchor,
            LinkKind::Relative(_) => LinkClass::Internal,
        }
    }

    /// Resolve an `href` to its final URL string.
    ///
    /// Internal links become absolute Markdown sibling URLs; everything else
    /// is returned unchanged. Never fails: hrefs that cannot be joined are
    /// passed through.
    pub fn resolve(&self, href: &str) -> String {
        if self.classify(href).is_passthrough() {
            return href.to_string();
        }

        match self.join(href) {
            Ok(mut url) => {
                let sibling = markdown_sibling(url.path());
                url.set_path(&sibling);
                url.into()
            }
            Err(_) => href.to_string(),
        }
    }

    /// Resolve an image/asset `src` to an absolute URL.
    ///
    /// Same join rules as [`resolve`](Self::resolve), without the Markdown
    /// extension rewrite.
    pub fn resolve_asset(&self, src: &str) -> String {
        match LinkKind::parse(src) {
            LinkKind::Anchor(_) | LinkKind::External(_) | LinkKind::Relative("") => {
                src.to_string()
            }
            LinkKind::SiteRoot(_) | LinkKind::Relative(_) => self
                .join(src)
                .map_or_else(|_| src.to_string(), String::from),
        }
    }

    fn join(&self, href: &str) -> Result<Url, url::ParseError> {
        self.dir_url()?.join(href)
    }

    /// Whether a site-root path names a page of this corpus.
    ///
    /// The path must lie under the base URL's path, and its last segment
    /// must look like a page: a directory, an extensionless name, or an
    /// `.html`/`.md` file. Anything else (images, archives, feeds) is an asset.
    fn is_corpus_path(&self, href: &str) -> bool {
        let (path, _) = split_path_suffix(href);
        let path = percent_decode_str(path).decode_utf8_lossy();
        let root = percent_decode_str(self.base.path()).decode_utf8_lossy();

        let under_root = path.starts_with(root.as_ref()) || path == root.trim_end_matches('/');
        under_root && is_page_path(&path)
    }
}

/// Normalize a page directory: no leading slash, trailing slash unless empty.
fn normalize_dir(dir: &str) -> String {
    let dir = dir.trim_start_matches('/');
    if dir.is_empty() || dir.ends_with('/') {
        dir.to_string()
    } else {
        format!("{dir}/")
    }
}

/// Whether the last segment of `path` looks like a documentation page.
fn is_page_path(path: &str) -> bool {
    let last = path.rsplit('/').next().unwrap_or_default();
    segment_extension(last).is_none_or(|ext| {
        matches!(ext.to_ascii_lowercase().as_str(), "html" | "htm" | "md")
    })
}

// =============================================================================
// Free Function
// =============================================================================

/// Resolve `href` found in the page at `current_dir` of the site at `base_uri`.
///
/// Convenience wrapper over [`PageAddress::resolve`]. A `base_uri` that does
/// not parse leaves the href unchanged.
pub fn resolve(href: &str, base_uri: &str, current_dir: &str) -> String {
    match PageAddress::new(base_uri, current_dir) {
        Ok(address) => address.resolve(href),
        Err(_) => href.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
