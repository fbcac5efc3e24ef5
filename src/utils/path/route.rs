//! URL processing utilities.
//!
//! Provides consistent URL handling across the codebase:
//! - Link type detection (external vs internal)
//! - Path/fragment splitting
//! - Markdown sibling naming

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 2 characters before the colon (rules out `C:` drive letters)
/// - Start with an ASCII letter
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// Protocol-relative links (`//cdn.example.com/x.js`) count as external.
///
/// # Examples
/// ```
/// use llmstxt::utils::path::route::is_external_link;
/// assert!(is_external_link("https://example.com"));
/// assert!(is_external_link("mailto:user@example.com"));
/// assert!(!is_external_link("/about"));
/// assert!(!is_external_link("./file.txt"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    link.find(':').is_some_and(|pos| {
        pos > 1
            && link.as_bytes()[0].is_ascii_alphabetic()
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Check if a link is a bare e-mail address (`user@example.com`).
///
/// Renderers auto-link such addresses without a `mailto:` scheme.
#[inline]
pub fn is_bare_email(link: &str) -> bool {
    let Some((user, host)) = link.split_once('@') else {
        return false;
    };
    !user.is_empty()
        && host.contains('.')
        && !link.contains(['/', '?', '#', ' '])
        && !host.starts_with('.')
}

/// Split a URL into path and suffix parts, where the suffix is the
/// query string and/or fragment (including its leading `?` or `#`).
///
/// # Examples
/// ```
/// use llmstxt::utils::path::route::split_path_suffix;
/// assert_eq!(split_path_suffix("/about#team"), ("/about", "#team"));
/// assert_eq!(split_path_suffix("a/?q=1#x"), ("a/", "?q=1#x"));
/// assert_eq!(split_path_suffix("/about"), ("/about", ""));
/// ```
#[inline]
pub fn split_path_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Extension of a path segment, if it has one.
///
/// Only suffixes containing a letter count, so version-like directory names
/// (`0.1.34`) are not mistaken for files. Dotfiles have no extension.
///
/// # Examples
/// ```
/// use llmstxt::utils::path::route::segment_extension;
/// assert_eq!(segment_extension("page.html"), Some("html"));
/// assert_eq!(segment_extension("0.1.34"), None);
/// assert_eq!(segment_extension(".hidden"), None);
/// ```
pub fn segment_extension(segment: &str) -> Option<&str> {
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.chars().any(|c| c.is_ascii_alphabetic()) => {
            Some(ext)
        }
        _ => None,
    }
}

/// Replace the extension of the last path segment with `.md`, or append
/// `index.md` when the path names a directory.
///
/// - `a/` → `a/index.md`
/// - `a/b` → `a/b/index.md`
/// - `a/b.html` → `a/b.md`
/// - `a/b.md`, `a/b.png` → unchanged
pub fn markdown_sibling(path: &str) -> String {
    if path.is_empty() || path.ends_with('/') {
        return format!("{path}index.md");
    }

    let (prefix, last) = match path.rsplit_once('/') {
        Some((dir, last)) => (format!("{dir}/"), last),
        None => (String::new(), path),
    };

    match segment_extension(last) {
        Some(ext @ ("html" | "htm")) => {
            let stem = &last[..last.len() - ext.len() - 1];
            format!("{prefix}{stem}.md")
        }
        Some(_) => path.to_string(),
        None => format!("{path}/index.md"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("http://example.com"));
        assert!(is_external_link("ftp://example.com/resource"));
        assert!(is_external_link("mailto:user@example.com"));
        assert!(is_external_link("tel:+1234567890"));
        assert!(is_external_link("//cdn.example.com/lib.js"));
        assert!(!is_external_link("/about"));
        assert!(!is_external_link("./file.txt"));
        assert!(!is_external_link("#section"));
        assert!(!is_external_link("C:/docs"));
    }

    #[test]
    fn test_is_bare_email() {
        assert!(is_bare_email("user@example.com"));
        assert!(!is_bare_email("mailto:user/x@example.com"));
        assert!(!is_bare_email("@example.com"));
        assert!(!is_bare_email("../page/"));
        assert!(!is_bare_email("user@localhost"));
    }

    #[test]
    fn test_split_path_suffix() {
        assert_eq!(split_path_suffix("/about#team"), ("/about", "#team"));
        assert_eq!(split_path_suffix("/about"), ("/about", ""));
        assert_eq!(split_path_suffix("#section"), ("", "#section"));
        assert_eq!(split_path_suffix("a?x=1"), ("a", "?x=1"));
    }

    #[test]
    fn test_markdown_sibling() {
        assert_eq!(markdown_sibling(""), "index.md");
        assert_eq!(markdown_sibling("/en/"), "/en/index.md");
        assert_eq!(markdown_sibling("/en/page1"), "/en/page1/index.md");
        assert_eq!(markdown_sibling("/en/page1.html"), "/en/page1.md");
        assert_eq!(markdown_sibling("index.html"), "index.md");
        assert_eq!(markdown_sibling("/assets/reference.md"), "/assets/reference.md");
        assert_eq!(markdown_sibling("/img/logo.png"), "/img/logo.png");
        assert_eq!(markdown_sibling("/en/.hidden"), "/en/.hidden/index.md");
        assert_eq!(markdown_sibling("/en/0.1.34"), "/en/0.1.34/index.md");
    }
}
