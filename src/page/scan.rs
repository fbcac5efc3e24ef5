//! Site directory discovery.
//!
//! Walks an already-built HTML site and extracts, per page, the metadata
//! and the content region handed to the transformer.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jwalk::WalkDir;

use super::meta::{PageMeta, src_uri_for};
use crate::{debug, log};
use crate::dom::{Document, Element, parse_html};
use crate::utils::html::collapse_whitespace;

/// Pages never included in the corpus.
const IGNORED_PAGES: &[&str] = &["404.html"];

/// A discovered page: metadata plus its content HTML.
#[derive(Debug, Clone)]
pub struct SitePage {
    pub meta: PageMeta,
    pub html: String,
}

/// Discover every HTML page under `site_dir`, sorted by destination path.
pub fn scan_site(site_dir: &Path) -> Result<Vec<SitePage>> {
    if !site_dir.is_dir() {
        anyhow::bail!("site directory `{}` does not exist", site_dir.display());
    }

    let (mut files, errors) = collect_html_files(site_dir);
    for err in &errors {
        log!("warning"; "skipped unreadable entry: {err}");
    }
    files.sort();

    let mut pages = Vec::with_capacity(files.len());
    for path in files {
        let Some(dest_uri) = dest_uri_of(site_dir, &path) else {
            log!("warning"; "skipped non UTF-8 path {}", path.display());
            continue;
        };
        if IGNORED_PAGES.contains(&dest_uri.as_str()) {
            continue;
        }

        let html = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let page = extract_page(&dest_uri, &html);
        debug!("scan"; "{} -> {}", page.meta.src_uri, page.meta.dest_uri);
        pages.push(page);
    }

    Ok(pages)
}

/// Build a page from a published path and its full HTML document.
pub fn extract_page(dest_uri: &str, html: &str) -> SitePage {
    let root = parse_html(html);
    let title = extract_title(&root);
    let html = extract_content(&root)
        .map(|content| Document::new(content.children.clone()).to_html())
        .unwrap_or_default();

    SitePage {
        meta: PageMeta::new(src_uri_for(dest_uri), dest_uri, title),
        html,
    }
}

/// HTML files under `dir`, plus the walk errors met on the way.
fn collect_html_files(dir: &Path) -> (Vec<PathBuf>, Vec<jwalk::Error>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(dir) {
        match entry {
            Ok(mut e) => {
                // Directory listing failures surface on the directory entry
                if let Some(err) = e.read_children_error.take() {
                    errors.push(err);
                }
                let path = e.path();
                if e.file_type().is_file() && path.extension().is_some_and(|ext| ext == "html") {
                    files.push(path);
                }
            }
            Err(err) => errors.push(err),
        }
    }

    (files, errors)
}

/// Site-relative, `/`-separated path of a file under `site_dir`.
fn dest_uri_of(site_dir: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(site_dir).ok()?;
    let parts: Vec<&str> = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

// =============================================================================
// Extraction
// =============================================================================

/// First `<h1>`, else `<title>`.
fn extract_title(root: &Element) -> Option<String> {
    let text_of = |elem: &Element| {
        let text = collapse_whitespace(&elem.text_content()).trim().to_string();
        (!text.is_empty()).then_some(text)
    };

    root.find(&|e| e.is("h1"))
        .and_then(text_of)
        .or_else(|| root.find(&|e| e.is("title")).and_then(text_of))
}

/// Main content region: `article`, else `main`, else `[role=main]`, else `body`.
fn extract_content(root: &Element) -> Option<&Element> {
    root.find(&|e| e.is("article"))
        .or_else(|| root.find(&|e| e.is("main")))
        .or_else(|| root.find(&|e| e.attr("role") == Some("main")))
        .or_else(|| root.find(&|e| e.is("body")))
}
