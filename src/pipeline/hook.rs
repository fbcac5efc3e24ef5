//! User pre-processing hook.
//!
//! The hook sees each page's document after cleaning and before Markdown
//! rendering. It is injected as a [`Preprocess`] value: any closure with the
//! right shape works, and [`CommandHook`] runs an external program.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;

use crate::dom::Document;
use crate::page::PageMeta;
use crate::utils::exec::Cmd;

/// Rewrites a page's document before it is rendered.
pub trait Preprocess {
    fn preprocess(&self, doc: Document, page: &PageMeta) -> Result<Document>;
}

impl<F> Preprocess for F
where
    F: Fn(Document, &PageMeta) -> Result<Document>,
{
    fn preprocess(&self, doc: Document, page: &PageMeta) -> Result<Document> {
        self(doc, page)
    }
}

// ============================================================================
// External command
// ============================================================================

/// Runs an external program as the pre-processing hook.
///
/// The program reads the page HTML on stdin and writes the replacement HTML
/// to stdout. Page metadata is passed in `$LLMSTXT_*` variables:
///
/// | Variable           | Value                              |
/// |--------------------|------------------------------------|
/// | `LLMSTXT_SRC_URI`  | source path (`guide/intro.md`)     |
/// | `LLMSTXT_DEST_URI` | published path                     |
/// | `LLMSTXT_TITLE`    | page title                         |
/// | `LLMSTXT_OUTPUT`   | index file name (`llms.txt`)       |
///
/// A non-zero exit status fails the page.
#[derive(Debug, Clone)]
pub struct CommandHook {
    program: PathBuf,
    cwd: PathBuf,
    output: String,
}

impl CommandHook {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>, output: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            cwd: cwd.into(),
            output: output.into(),
        }
    }

    /// Build `$LLMSTXT_*` environment variables for one page.
    fn vars(&self, page: &PageMeta) -> FxHashMap<&'static str, String> {
        let mut vars = FxHashMap::default();
        vars.insert("LLMSTXT_SRC_URI", page.src_uri.clone());
        vars.insert("LLMSTXT_DEST_URI", page.dest_uri.clone());
        vars.insert("LLMSTXT_TITLE", page.title.clone());
        vars.insert("LLMSTXT_OUTPUT", self.output.clone());
        vars
    }
}

impl Preprocess for CommandHook {
    fn preprocess(&self, doc: Document, page: &PageMeta) -> Result<Document> {
        let output = Cmd::new(&self.program)
            .cwd(&self.cwd)
            .envs(self.vars(page))
            .stdin(doc.to_html())
            .run()?;

        let html = String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` wrote non UTF-8 output", self.program.display()))?;
        Ok(Document::parse(&html))
    }
}
