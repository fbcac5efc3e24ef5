//! Per-page metadata supplied by the host.

use crate::utils::path::route::segment_extension;

/// What the host knows about one page.
///
/// | Field      | Example          | Description                          |
/// |------------|------------------|--------------------------------------|
/// | `src_uri`  | `guide/intro.md` | Source path, as named in config      |
/// | `dest_uri` | `guide/intro/index.html` | Published path, site-relative |
/// | `title`    | `Introduction`   | Page title (falls back to `src_uri`) |
///
/// A directory index page (`guide/index.html`) can also be named by its
/// index source path (`guide/index.md`), kept in `src_alias`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub src_uri: String,
    pub src_alias: Option<String>,
    pub dest_uri: String,
    pub title: String,
}

impl PageMeta {
    pub fn new(
        src_uri: impl Into<String>,
        dest_uri: impl Into<String>,
        title: Option<String>,
    ) -> Self {
        let src_uri = src_uri.into();
        let dest_uri = dest_uri.into();
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| src_uri.clone());
        let src_alias = dest_uri
            .strip_suffix("/index.html")
            .map(|dir| format!("{dir}/index.md"))
            .filter(|alias| *alias != src_uri);
        Self {
            src_uri,
            src_alias,
            dest_uri,
            title,
        }
    }

    /// Every source path the page can be named by in config.
    pub fn src_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.src_uri.as_str()).chain(self.src_alias.as_deref())
    }

    /// Directory of the published page, relative to the site root.
    ///
    /// Relative links in the page resolve against it.
    pub fn current_dir(&self) -> &str {
        self.dest_uri
            .rsplit_once('/')
            .map_or("", |(dir, _)| dir)
    }

    /// Site-relative path of the page's Markdown sibling.
    ///
    /// ```
    /// use llmstxt::page::PageMeta;
    ///
    /// let page = PageMeta::new("a.md", "a/index.html", None);
    /// assert_eq!(page.md_uri(), "a/index.md");
    /// ```
    pub fn md_uri(&self) -> String {
        let dest = self.dest_uri.as_str();
        if dest.is_empty() || dest.ends_with('/') {
            return format!("{dest}index.md");
        }

        let (dir, name) = match dest.rsplit_once('/') {
            Some((dir, name)) => (Some(dir), name),
            None => (None, dest),
        };
        let stem = match segment_extension(name) {
            Some(ext) => &name[..name.len() - ext.len() - 1],
            None => name,
        };
        match dir {
            Some(dir) => format!("{dir}/{stem}.md"),
            None => format!("{stem}.md"),
        }
    }
}

/// Derive the source URI of a published page from its destination URI.
///
/// Sites built with directory URLs publish `a.md` as `a/index.html`:
///
/// | Destination       | Source     |
/// |-------------------|------------|
/// | `index.html`      | `index.md` |
/// | `a/index.html`    | `a.md`     |
/// | `a/b.html`        | `a/b.md`   |
pub fn src_uri_for(dest_uri: &str) -> String {
    if dest_uri == "index.html" {
        return "index.md".to_string();
    }
    if let Some(dir) = dest_uri.strip_suffix("/index.html") {
        return format!("{dir}.md");
    }
    match dest_uri.strip_suffix(".html") {
        Some(stem) => format!("{stem}.md"),
        None => dest_uri.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_fallback() {
        assert_eq!(PageMeta::new("a.md", "a/index.html", None).title, "a.md");
        assert_eq!(PageMeta::new("a.md", "a/index.html", Some("  ".into())).title, "a.md");
        assert_eq!(PageMeta::new("a.md", "a/index.html", Some("A".into())).title, "A");
    }

    #[test]
    fn test_index_page_alias() {
        let page = PageMeta::new("guide.md", "guide/index.html", None);
        assert_eq!(page.src_names().collect::<Vec<_>>(), ["guide.md", "guide/index.md"]);

        let root = PageMeta::new("index.md", "index.html", None);
        assert_eq!(root.src_names().collect::<Vec<_>>(), ["index.md"]);
        let leaf = PageMeta::new("guide/b.md", "guide/b.html", None);
        assert_eq!(leaf.src_alias, None);
    }

    #[test]
    fn test_current_dir() {
        assert_eq!(PageMeta::new("index.md", "index.html", None).current_dir(), "");
        assert_eq!(PageMeta::new("a.md", "a/index.html", None).current_dir(), "a");
        assert_eq!(PageMeta::new("a/b.md", "a/b/index.html", None).current_dir(), "a/b");
    }

    #[test]
    fn test_md_uri() {
        let md = |dest: &str| PageMeta::new("x.md", dest, None).md_uri();
        assert_eq!(md("index.html"), "index.md");
        assert_eq!(md("a/index.html"), "a/index.md");
        assert_eq!(md("a/b.html"), "a/b.md");
        assert_eq!(md("a/"), "a/index.md");
        assert_eq!(md(""), "index.md");
    }

    #[test]
    fn test_src_uri_for() {
        assert_eq!(src_uri_for("index.html"), "index.md");
        assert_eq!(src_uri_for("page1/index.html"), "page1.md");
        assert_eq!(src_uri_for("guide/intro/index.html"), "guide/intro.md");
        assert_eq!(src_uri_for("guide/b.html"), "guide/b.md");
    }
}
