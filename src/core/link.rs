//! Link classification utilities.

use crate::utils::path::route::{is_bare_email, is_external_link};

/// Syntactic classification of links.
///
/// Depends only on the shape of the href string, never on the page that
/// contains it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Pure fragment/anchor link (#section). Value is anchor without `#`.
    Anchor(&'a str),
    /// External link with URL scheme (https://, mailto:, tel:, etc.),
    /// protocol-relative link, or bare e-mail address.
    External(&'a str),
    /// Site-root-relative path (/about, /en/0.1.34/page1/).
    SiteRoot(&'a str),
    /// File-relative path (../page1/, section/guide/, img.png).
    Relative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if let Some(anchor) = link.strip_prefix('#') {
            Self::Anchor(anchor)
        } else if is_external_link(link) || is_bare_email(link) {
            Self::External(link)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::Relative(link)
        }
    }
}

/// Final classification of a link within a corpus.
///
/// Unlike [`LinkKind`], telling [`LinkClass::AbsoluteForeign`] from
/// [`LinkClass::Internal`] for site-root paths needs the corpus root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkClass {
    /// `#section`, left unchanged.
    Anchor,
    /// Scheme or mail target, left unchanged.
    ExternalScheme,
    /// Site-root path outside the corpus (assets, other routes), left unchanged.
    AbsoluteForeign,
    /// Another corpus page, rewritten to its Markdown sibling URL.
    Internal,
}

impl LinkClass {
    /// Whether links of this class are returned byte-identical.
    #[inline]
    pub fn is_passthrough(self) -> bool {
        !matches!(self, Self::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_external() {
        assert!(matches!(
            LinkKind::parse("https://example.com"),
            LinkKind::External("https://example.com")
        ));
        assert!(matches!(
            LinkKind::parse("ftp://example.com/resource"),
            LinkKind::External(_)
        ));
        assert!(matches!(
            LinkKind::parse("mailto:user@example.com"),
            LinkKind::External("mailto:user@example.com")
        ));
        // Auto-linked address without scheme
        assert!(matches!(
            LinkKind::parse("test@example.com"),
            LinkKind::External("test@example.com")
        ));
    }

    #[test]
    fn test_parse_anchor() {
        assert!(matches!(
            LinkKind::parse("#section"),
            LinkKind::Anchor("section")
        ));
        assert!(matches!(LinkKind::parse("#"), LinkKind::Anchor("")));
    }

    #[test]
    fn test_parse_site_root() {
        assert!(matches!(LinkKind::parse("/abs1/"), LinkKind::SiteRoot("/abs1/")));
        assert!(matches!(
            LinkKind::parse("/about#team"),
            LinkKind::SiteRoot("/about#team")
        ));
    }

    #[test]
    fn test_parse_relative() {
        assert!(matches!(LinkKind::parse("../"), LinkKind::Relative("../")));
        assert!(matches!(
            LinkKind::parse("section/guide/"),
            LinkKind::Relative("section/guide/")
        ));
        assert!(matches!(
            LinkKind::parse("./page#section"),
            LinkKind::Relative("./page#section")
        ));
        assert!(matches!(LinkKind::parse(""), LinkKind::Relative("")));
    }

    #[test]
    fn test_passthrough() {
        assert!(LinkClass::Anchor.is_passthrough());
        assert!(LinkClass::ExternalScheme.is_passthrough());
        assert!(LinkClass::AbsoluteForeign.is_passthrough());
        assert!(!LinkClass::Internal.is_passthrough());
    }
}
