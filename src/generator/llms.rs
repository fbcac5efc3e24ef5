//! `llms.txt` / `llms-full.txt` generation.
//!
//! # Index Format
//!
//! ```markdown
//! # My project
//!
//! > One-line summary
//!
//! Longer free text.
//!
//! ## Usage
//!
//! - [Home](https://example.org/index.md)
//! - [Page 1](https://example.org/page1/index.md): Some usage docs.
//! ```
//!
//! The full-text document has the same header and section headings, with
//! each page's Markdown body embedded in place of the links list (for
//! sections with `full_content` enabled).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{debug, log};

/// A page converted to Markdown, ready for aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedPage {
    pub title: String,
    /// Where the Markdown sibling is written.
    pub path_md: PathBuf,
    /// Published URL of the Markdown sibling.
    pub md_url: String,
    /// Normalized Markdown body.
    pub content: String,
    /// One-line description from the section entry.
    pub description: Option<String>,
}

/// Pages of one section, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBuffer {
    pub name: String,
    pub full_content: bool,
    pub pages: Vec<TransformedPage>,
}

impl SectionBuffer {
    pub fn new(name: impl Into<String>, full_content: bool) -> Self {
        Self {
            name: name.into(),
            full_content,
            pages: Vec::new(),
        }
    }
}

/// Header shared by both documents.
#[derive(Debug, Clone, Copy)]
pub struct SiteHeader<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub markdown_description: Option<&'a str>,
}

// ============================================================================
// Aggregation
// ============================================================================

/// Build the index and full-text documents.
///
/// Sections keep their order, pages keep their insertion order. Nothing is
/// reordered or deduplicated. Sections that received no page are left out.
pub fn aggregate(sections: &[SectionBuffer], header: &SiteHeader<'_>) -> (String, String) {
    let mut index = header_blocks(header);
    let mut full = index.clone();

    for section in sections.iter().filter(|s| !s.pages.is_empty()) {
        let heading = format!("## {}", section.name);
        let links = links_list(&section.pages);

        index.push(heading.clone());
        index.extend(links.clone());

        full.push(heading);
        if section.full_content {
            full.extend(
                section
                    .pages
                    .iter()
                    .map(|page| page.content.trim_end().to_string())
                    .filter(|content| !content.is_empty()),
            );
        } else {
            full.extend(links);
        }
    }

    (join_blocks(&index), join_blocks(&full))
}

fn header_blocks(header: &SiteHeader<'_>) -> Vec<String> {
    let mut blocks = vec![format!("# {}", header.title)];
    if let Some(desc) = header.description.map(str::trim).filter(|d| !d.is_empty()) {
        blocks.push(format!("> {desc}"));
    }
    if let Some(text) = header.markdown_description.map(str::trim).filter(|d| !d.is_empty()) {
        blocks.push(text.to_string());
    }
    blocks
}

/// The links list of a section, as one block (or none when empty).
fn links_list(pages: &[TransformedPage]) -> Option<String> {
    if pages.is_empty() {
        return None;
    }
    let items: Vec<String> = pages
        .iter()
        .map(|page| {
            let mut item = format!("- [{}]({})", escape_link_text(&page.title), page.md_url);
            if let Some(desc) = page.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
                item.push_str(": ");
                item.push_str(desc);
            }
            item
        })
        .collect();
    Some(items.join("\n"))
}

fn join_blocks(blocks: &[String]) -> String {
    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Escape brackets so a title cannot close the link text early.
fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

// ============================================================================
// Output
// ============================================================================

/// Files written by [`write_outputs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Markdown siblings, in write order.
    pub siblings: Vec<PathBuf>,
    /// Index file.
    pub index: PathBuf,
    /// Full-text file, when configured.
    pub full: Option<PathBuf>,
}

/// Write every page's Markdown sibling, the index and the full-text file.
///
/// A page listed in several sections is written once.
pub fn write_outputs(
    sections: &[SectionBuffer],
    header: &SiteHeader<'_>,
    index_path: &Path,
    full_path: Option<&Path>,
) -> Result<BuildReport> {
    let mut report = BuildReport {
        index: index_path.to_path_buf(),
        full: full_path.map(Path::to_path_buf),
        ..Default::default()
    };

    for page in sections.iter().flat_map(|s| &s.pages) {
        if report.siblings.contains(&page.path_md) {
            continue;
        }
        debug!("llmstxt"; "generating {}", page.path_md.display());
        write_file(&page.path_md, &page.content)?;
        report.siblings.push(page.path_md.clone());
    }

    let (index, full) = aggregate(sections, header);

    write_file(index_path, &index)?;
    log!("llmstxt"; "generated {}", display_name(index_path));

    if let Some(full_path) = full_path {
        write_file(full_path, &full)?;
        log!("llmstxt"; "generated {}", display_name(full_path));
    }

    Ok(report)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
