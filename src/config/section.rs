//! `[[sections]]` configuration.
//!
//! # Example
//!
//! ```toml
//! [[sections]]
//! name = "Usage"
//! full_content = true         # Embed page bodies in the full-text file
//! pages = [
//!     "index.md",                             # bare source path
//!     { "page1.md" = "Some usage docs." },    # path + one-line description
//!     "guide/*.md",                           # glob over all source paths
//! ]
//! ```
//!
//! Glob entries are expanded against the source paths of every known page
//! when the build starts.

use std::collections::BTreeMap;

use globset::Glob;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::types::{ConfigDiagnostics, ConfigError, FieldPath};
use crate::log;
use crate::page::PageMeta;

/// One named section of the generated documents.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    /// Section heading (`## <name>`).
    pub name: String,

    /// Embed page bodies in the full-text file (otherwise list links).
    #[serde(default = "default_true")]
    pub full_content: bool,

    /// Page entries: bare source paths, globs, or `{ path = "description" }`.
    #[serde(default)]
    pub pages: Vec<PageEntry>,
}

fn default_true() -> bool {
    true
}

/// A page entry as written in config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PageEntry {
    /// `"page.md"` or `"guide/*.md"`
    Bare(String),
    /// `{ "page.md" = "One-line description." }`
    Described(BTreeMap<String, String>),
}

impl PageEntry {
    /// Pattern and description, or `None` when a described entry does not
    /// hold exactly one pair.
    pub fn parts(&self) -> Option<(&str, Option<&str>)> {
        match self {
            Self::Bare(pattern) => Some((pattern.as_str(), None)),
            Self::Described(map) if map.len() == 1 => map
                .iter()
                .next()
                .map(|(pattern, desc)| (pattern.as_str(), Some(desc.as_str()))),
            Self::Described(_) => None,
        }
    }
}

/// Whether an entry is a glob pattern rather than a literal path.
#[inline]
fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

impl SectionConfig {
    /// Validate this section (the `index`-th in declaration order).
    pub(super) fn validate(&self, index: usize, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(FieldPath::section(index, "name"), "section name must not be empty");
        }

        for (entry_index, entry) in self.pages.iter().enumerate() {
            let field = FieldPath::section_page(index, entry_index);
            match entry.parts() {
                None => diag.error_with_hint(
                    field,
                    "page entry must map exactly one path to its description",
                    r#"write { "page.md" = "description" }"#,
                ),
                Some(("", _)) => diag.error(field, "page path must not be empty"),
                Some((pattern, _)) if is_glob(pattern) => {
                    if let Err(err) = Glob::new(pattern) {
                        diag.error(field, format!("invalid glob `{pattern}`: {err}"));
                    }
                }
                Some(_) => {}
            }
        }
    }

    /// Expand the entries against the source paths of all known pages
    /// (including index aliases, see [`PageMeta::src_names`]).
    ///
    /// A page named several times keeps the description of its first entry.
    pub fn resolve<S: AsRef<str>>(&self, src_uris: &[S]) -> Result<ResolvedSection, ConfigError> {
        let mut pages: FxHashMap<String, (usize, Option<String>)> = FxHashMap::default();

        for (order, entry) in self.pages.iter().enumerate() {
            let mut add = |src_uri: &str, description: Option<&str>| {
                pages
                    .entry(src_uri.to_string())
                    .or_insert_with(|| (order, description.map(str::to_string)));
            };

            let Some((pattern, description)) = entry.parts() else {
                return Err(ConfigError::Validation(format!(
                    "section `{}`: malformed page entry {entry:?}",
                    self.name
                )));
            };

            if !is_glob(pattern) {
                if !src_uris.iter().any(|uri| uri.as_ref() == pattern) {
                    log!("warning"; "section `{}`: no page `{}`", self.name, pattern);
                }
                add(pattern, description);
                continue;
            }

            let matcher = Glob::new(pattern)
                .map_err(|err| {
                    ConfigError::Validation(format!("invalid glob `{pattern}`: {err}"))
                })?
                .compile_matcher();
            for uri in src_uris.iter().map(AsRef::as_ref) {
                if matcher.is_match(uri) {
                    add(uri, description);
                }
            }
        }

        Ok(ResolvedSection {
            name: self.name.clone(),
            full_content: self.full_content,
            pages,
        })
    }
}

// ============================================================================
// Resolved section
// ============================================================================

/// A section with every entry expanded to concrete source paths.
#[derive(Debug, Clone)]
pub struct ResolvedSection {
    pub name: String,
    pub full_content: bool,
    /// Source path -> (entry position, description)
    pages: FxHashMap<String, (usize, Option<String>)>,
}

impl ResolvedSection {
    /// Whether this source path belongs to the section.
    pub fn contains(&self, src_uri: &str) -> bool {
        self.pages.contains_key(src_uri)
    }

    /// Whether the page belongs to the section under any of its names.
    pub fn contains_page(&self, page: &PageMeta) -> bool {
        page.src_names().any(|name| self.contains(name))
    }

    /// Description of the earliest entry naming the page.
    pub fn page_description(&self, page: &PageMeta) -> Option<&str> {
        page.src_names()
            .filter_map(|name| self.pages.get(name))
            .min_by_key(|(order, _)| *order)
            .and_then(|(_, desc)| desc.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(toml_str: &str) -> SectionConfig {
        toml::from_str(toml_str).unwrap()
    }

    const URIS: &[&str] = &["index.md", "page1.md", "guide/a.md", "guide/b.md", "other.md"];

    #[test]
    fn test_parse_entries() {
        let s = section(
            r#"
            name = "Usage"
            pages = ["index.md", { "page1.md" = "Some usage docs." }]
            "#,
        );
        assert!(s.full_content);
        assert_eq!(s.pages[0].parts(), Some(("index.md", None)));
        assert_eq!(s.pages[1].parts(), Some(("page1.md", Some("Some usage docs."))));
    }

    #[test]
    fn test_resolve_glob() {
        let s = section(r#"name = "Guide"
pages = ["guide/*.md"]"#);
        let resolved = s.resolve(URIS).unwrap();
        assert!(resolved.contains("guide/a.md"));
        assert!(resolved.contains("guide/b.md"));
        assert!(!resolved.contains("index.md"));
    }

    #[test]
    fn test_resolve_keeps_first_description() {
        let s = section(
            r#"
            name = "All"
            pages = [{ "page1.md" = "first" }, { "*.md" = "glob" }]
            "#,
        );
        let resolved = s.resolve(URIS).unwrap();
        let page1 = PageMeta::new("page1.md", "page1/index.html", None);
        let index = PageMeta::new("index.md", "index.html", None);
        assert_eq!(resolved.page_description(&page1), Some("first"));
        assert_eq!(resolved.page_description(&index), Some("glob"));
        // `*` crosses directories, like shell-style fnmatch
        assert!(resolved.contains("guide/a.md"));
    }

    #[test]
    fn test_resolve_index_alias() {
        let guide = PageMeta::new("guide.md", "guide/index.html", None);
        let names: Vec<&str> = guide.src_names().collect();

        for pattern in ["guide.md", "guide/index.md", "guide/*.md"] {
            let s = section(&format!("name = \"Guide\"\npages = [{{ \"{pattern}\" = \"d\" }}]"));
            let resolved = s.resolve(&names).unwrap();
            assert!(resolved.contains_page(&guide), "pattern: {pattern}");
            assert_eq!(resolved.page_description(&guide), Some("d"));
        }

        let s = section(
            r#"
            name = "Guide"
            pages = ["guide/index.md", { "guide.md" = "later" }]
            "#,
        );
        let resolved = s.resolve(&names).unwrap();
        assert_eq!(resolved.page_description(&guide), None);
    }

    #[test]
    fn test_validate_entries() {
        let s = section(
            r#"
            name = ""
            pages = [{ "a.md" = "x", "b.md" = "y" }, "", "guide/[.md"]
            "#,
        );
        let mut diag = ConfigDiagnostics::new();
        s.validate(0, &mut diag);
        let fields: Vec<_> = diag.errors().iter().map(|d| d.field.as_str()).collect();
        assert_eq!(
            fields,
            ["sections[0].name", "sections[0].pages[0]", "sections[0].pages[1]", "sections[0].pages[2]"]
        );
    }

    #[test]
    fn test_full_content_flag() {
        let s = section(r#"name = "API"
full_content = false"#);
        assert!(!s.full_content);
        assert!(s.pages.is_empty());
    }
}
