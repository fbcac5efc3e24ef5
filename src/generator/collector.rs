//! Two-phase page collection.
//!
//! ```text
//! for each page:  on_page(html, meta)  →  transform + buffer, html returned as-is
//! once at end:    finish()             →  write siblings, llms.txt, llms-full.txt
//! ```

use std::path::PathBuf;

use anyhow::Result;
use url::Url;

use super::llms::{BuildReport, SectionBuffer, SiteHeader, TransformedPage, write_outputs};
use crate::config::{LlmsConfig, ResolvedSection};
use crate::debug;
use crate::page::PageMeta;
use crate::pipeline::{PageAddress, PageTransformer};

/// Collects transformed pages per section during a build.
pub struct Collector {
    transformer: PageTransformer,
    site_url: Url,
    site_dir: PathBuf,
    site_name: String,
    site_description: Option<String>,
    markdown_description: Option<String>,
    output: PathBuf,
    full_output: Option<PathBuf>,
    sections: Vec<ResolvedSection>,
    buffers: Vec<SectionBuffer>,
}

impl Collector {
    /// Create a collector for already-resolved sections.
    pub fn new(
        config: &LlmsConfig,
        sections: Vec<ResolvedSection>,
        transformer: PageTransformer,
    ) -> Result<Self> {
        let buffers = sections
            .iter()
            .map(|s| SectionBuffer::new(s.name.clone(), s.full_content))
            .collect();

        Ok(Self {
            transformer,
            site_url: config.site_url()?,
            site_dir: config.site_dir(),
            site_name: config.site_name(),
            site_description: config.site_description.clone(),
            markdown_description: config.markdown_description.clone(),
            output: config.output_path(),
            full_output: config.full_output_path(),
            sections,
            buffers,
        })
    }

    /// Transform a page and buffer it in every section it belongs to.
    ///
    /// Returns the HTML unchanged. Pages outside every section are skipped
    /// without being transformed.
    pub fn on_page<'h>(&mut self, html: &'h str, page: &PageMeta) -> Result<&'h str> {
        let members: Vec<usize> = self
            .sections
            .iter()
            .enumerate()
            .filter(|(_, s)| s.contains_page(page))
            .map(|(i, _)| i)
            .collect();

        if members.is_empty() {
            debug!("llmstxt"; "skip {}", page.src_uri);
            return Ok(html);
        }

        let address = PageAddress::from_url(self.site_url.clone(), page.current_dir());
        let content = self.transformer.transform(html, &address, page)?;

        let md_uri = page.md_uri();
        let md_url = self
            .site_url
            .join(&md_uri)
            .map_or_else(|_| format!("{}{md_uri}", self.site_url), String::from);
        let path_md = self.site_dir.join(&md_uri);

        for i in members {
            let description = self.sections[i].page_description(page).map(str::to_string);
            self.buffers[i].pages.push(TransformedPage {
                title: page.title.clone(),
                path_md: path_md.clone(),
                md_url: md_url.clone(),
                content: content.clone(),
                description,
            });
        }

        Ok(html)
    }

    /// Buffered sections, in declaration order.
    pub fn sections(&self) -> &[SectionBuffer] {
        &self.buffers
    }

    /// Write all Markdown siblings and the aggregate documents.
    pub fn finish(self) -> Result<BuildReport> {
        let header = SiteHeader {
            title: &self.site_name,
            description: self.site_description.as_deref(),
            markdown_description: self.markdown_description.as_deref(),
        };
        write_outputs(&self.buffers, &header, &self.output, self.full_output.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const CONFIG: &str = r#"
site_name = "Test"
site_url = "https://example.org/en/0.1.34/"
full_output = "llms-full.txt"

[[sections]]
name = "Usage"
pages = ["index.md", { "page1.md" = "Some usage docs." }]
"#;

    fn collector(dir: &TempDir) -> Collector {
        let mut config = LlmsConfig::from_str(CONFIG).unwrap();
        config.root = dir.path().to_path_buf();
        let sections = config.resolve_sections(&["index.md", "page1.md", "other.md"]).unwrap();
        Collector::new(&config, sections, PageTransformer::new(true)).unwrap()
    }

    #[test]
    fn test_on_page_returns_html_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut collector = collector(&dir);
        let html = "<h1>Home</h1><nav>x</nav>";
        let page = PageMeta::new("index.md", "index.html", Some("Home".into()));
        assert_eq!(collector.on_page(html, &page).unwrap(), html);

        let buffered = &collector.sections()[0].pages[0];
        assert_eq!(buffered.content, "# Home\n");
        assert_eq!(buffered.md_url, "https://example.org/en/0.1.34/index.md");
        assert_eq!(buffered.path_md, dir.path().join("site/index.md"));
    }

    #[test]
    fn test_pages_outside_sections_skipped() {
        let dir = TempDir::new().unwrap();
        let mut collector = collector(&dir);
        let page = PageMeta::new("other.md", "other/index.html", None);
        collector.on_page("<p>x</p>", &page).unwrap();
        assert!(collector.sections()[0].pages.is_empty());
    }

    #[test]
    fn test_insertion_order_is_processing_order() {
        let dir = TempDir::new().unwrap();
        let mut collector = collector(&dir);
        collector
            .on_page("<p>1</p>", &PageMeta::new("page1.md", "page1/index.html", Some("P1".into())))
            .unwrap();
        collector
            .on_page("<p>0</p>", &PageMeta::new("index.md", "index.html", Some("Home".into())))
            .unwrap();
        let titles: Vec<_> = collector.sections()[0]
            .pages
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["P1", "Home"]);
        assert_eq!(
            collector.sections()[0].pages[0].description.as_deref(),
            Some("Some usage docs.")
        );
    }

    #[test]
    fn test_two_page_build() {
        let dir = TempDir::new().unwrap();
        let mut collector = collector(&dir);

        collector
            .on_page(
                "<h1>Home</h1><p>Welcome.</p>",
                &PageMeta::new("index.md", "index.html", Some("Home".into())),
            )
            .unwrap();
        collector
            .on_page(
                r#"<h1>Usage</h1><p>Hello world, <a href="../">home</a>.</p>"#,
                &PageMeta::new("page1.md", "page1/index.html", Some("Usage".into())),
            )
            .unwrap();

        let report = collector.finish().unwrap();
        let site = dir.path().join("site");
        assert_eq!(report.siblings, vec![site.join("index.md"), site.join("page1/index.md")]);

        let index = fs::read_to_string(site.join("llms.txt")).unwrap();
        assert!(index.contains("Some usage docs."));
        assert!(!index.contains("Hello world"));
        assert!(index.contains("- [Usage](https://example.org/en/0.1.34/page1/index.md): Some usage docs."));

        let full = fs::read_to_string(site.join("llms-full.txt")).unwrap();
        assert!(full.contains("Hello world"));
        assert!(!full.contains("Some usage docs."));

        let sibling = fs::read_to_string(site.join("page1/index.md")).unwrap();
        assert_eq!(
            sibling,
            "# Usage\n\nHello world, [home](https://example.org/en/0.1.34/index.md).\n"
        );
    }
}
