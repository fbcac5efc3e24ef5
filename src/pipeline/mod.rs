//! Page processing pipeline.
//!
//! Turns one page's rendered HTML into normalized Markdown:
//!
//! ```text
//! ┌──────┐   ┌───────────┐   ┌────────────┐   ┌──────────────────┐   ┌───────────┐
//! │ HTML │ → │ clean     │ → │ preprocess │ → │ convert + links  │ → │ normalize │
//! └──────┘   │ (autoclean)│   │ (optional) │   └──────────────────┘   └───────────┘
//!            └───────────┘   └────────────┘
//! ```
//!
//! The pipeline knows nothing about sections or output files; see
//! [`crate::generator`] for aggregation.

pub mod hook;
pub mod transform;

use anyhow::{Context, Result};

use crate::dom::Document;
use crate::markdown::to_markdown;
use crate::page::PageMeta;

pub use hook::{CommandHook, Preprocess};
pub use transform::PageAddress;

/// Transform one page's HTML into Markdown.
///
/// A hook failure aborts the page with its error, wrapped with the page's
/// source path.
pub fn transform(
    html: &str,
    address: &PageAddress,
    autoclean: bool,
    hook: Option<&dyn Preprocess>,
    page: &PageMeta,
) -> Result<String> {
    let mut doc = Document::parse(html);

    if autoclean {
        transform::clean(&mut doc);
    }

    if let Some(hook) = hook {
        doc = hook
            .preprocess(doc, page)
            .with_context(|| format!("preprocess failed for `{}`", page.src_uri))?;
    }

    Ok(to_markdown(&doc, address))
}

// =============================================================================
// Transformer
// =============================================================================

/// Page transformer configured once per build.
#[derive(Default)]
pub struct PageTransformer {
    autoclean: bool,
    hook: Option<Box<dyn Preprocess>>,
}

impl PageTransformer {
    pub fn new(autoclean: bool) -> Self {
        Self {
            autoclean,
            hook: None,
        }
    }

    /// Install the pre-processing hook.
    pub fn with_hook(mut self, hook: impl Preprocess + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn transform(&self, html: &str, address: &PageAddress, page: &PageMeta) -> Result<String> {
        transform(html, address, self.autoclean, self.hook.as_deref(), page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    const BASE: &str = "https://example.org/en/0.1.34/";

    const SOURCE_PAGE: &str = r#"
    <div>
        <h3>Some function</h3>
        <table class="highlighttable">
            <tr>
                <td class="linenos"><pre>1
2</pre></td>
                <td class="code">
                    <pre><code class="language-python"><span class="k">def</span> example():
    return 1</code></pre>
                </td>
            </tr>
        </table>
    </div>
    "#;

    fn page() -> PageMeta {
        PageMeta::new("page2.md", "page2/index.html", Some("Page 2".into()))
    }

    fn address() -> PageAddress {
        PageAddress::new(BASE, page().current_dir()).unwrap()
    }

    #[test]
    fn test_source_table_becomes_fence() {
        let md = PageTransformer::new(true)
            .transform(SOURCE_PAGE, &address(), &page())
            .unwrap();
        assert!(md.lines().any(|line| line == "```python"), "{md}");
        assert!(md.contains("def example():\n    return 1\n```"));
        assert!(md.contains("<summary>Source code</summary>"));
        assert!(!md.contains('|'));
    }

    #[test]
    fn test_links_in_page() {
        let html = r#"<p><a href="../">Home</a>, <a href="../assets/reference.md">ref</a>, <a href="/abs1/">abs</a></p>"#;
        let md = PageTransformer::new(true)
            .transform(html, &address(), &page())
            .unwrap();
        assert_eq!(
            md,
            "[Home](https://example.org/en/0.1.34/index.md), \
             [ref](https://example.org/en/0.1.34/assets/reference.md), [abs](/abs1/)\n"
        );
    }

    #[test]
    fn test_autoclean_disabled_keeps_chrome() {
        let html = r##"<h1>T<a class="headerlink" href="#t">¶</a></h1>"##;
        let kept = PageTransformer::new(false)
            .transform(html, &address(), &page())
            .unwrap();
        let cleaned = PageTransformer::new(true)
            .transform(html, &address(), &page())
            .unwrap();
        assert_eq!(kept, "# T[¶](#t)\n");
        assert_eq!(cleaned, "# T\n");
    }

    #[test]
    fn test_hook_runs_before_conversion() {
        let transformer = PageTransformer::new(true).with_hook(
            |mut doc: Document, page: &PageMeta| -> Result<Document> {
                doc.nodes.insert(0, Element::new("h1").with_text(page.title.clone()).into());
                Ok(doc)
            },
        );
        let md = transformer
            .transform(r#"<p><a href="../page1/">one</a></p>"#, &address(), &page())
            .unwrap();
        assert_eq!(
            md,
            "# Page 2\n\n[one](https://example.org/en/0.1.34/page1/index.md)\n"
        );
    }

    #[test]
    fn test_hook_failure_is_fatal() {
        let transformer = PageTransformer::new(true).with_hook(
            |_: Document, _: &PageMeta| -> Result<Document> { anyhow::bail!("boom") },
        );
        let err = transformer
            .transform("<p>x</p>", &address(), &page())
            .unwrap_err();
        assert!(err.to_string().contains("page2.md"));
        assert_eq!(err.root_cause().to_string(), "boom");
    }
}
