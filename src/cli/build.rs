//! `llmstxt build`: scan the built site and write the corpus.

use anyhow::{Context, Result, bail};

use super::{BuildArgs, Cli, absolute, load_config};
use crate::config::LlmsConfig;
use crate::generator::{BuildReport, Collector};
use crate::log;
use crate::page::scan_site;
use crate::pipeline::{CommandHook, PageTransformer};

/// Entry point of the `build` command.
pub fn run(cli: &Cli, args: &BuildArgs) -> Result<BuildReport> {
    let Some(mut config) = load_config(cli)? else {
        bail!(
            "Config file '{}' not found in this directory or any parent.",
            cli.config.display()
        );
    };

    let site_dir = args.site_dir.as_deref().map(absolute).transpose()?;
    config.apply_overrides(site_dir.as_deref(), args.site_url.as_deref());
    config.validate()?;

    build_site(&config)
}

/// Run the two-phase build for a validated configuration.
pub fn build_site(config: &LlmsConfig) -> Result<BuildReport> {
    let site_dir = config.site_dir();
    let pages = scan_site(&site_dir)?;

    let src_uris: Vec<&str> = pages.iter().flat_map(|p| p.meta.src_names()).collect();
    let sections = config.resolve_sections(&src_uris)?;

    let mut transformer = PageTransformer::new(config.autoclean);
    if let Some(program) = config.preprocess_path() {
        let output_name = config.output.to_string_lossy().into_owned();
        transformer = transformer.with_hook(CommandHook::new(program, &config.root, output_name));
    }

    let mut collector = Collector::new(config, sections, transformer)?;
    for page in &pages {
        collector
            .on_page(&page.html, &page.meta)
            .with_context(|| format!("Failed to convert {}", page.meta.dest_uri))?;
    }

    let report = collector.finish()?;
    log!(
        "llmstxt";
        "{} of {} pages in {} sections",
        report.siblings.len(),
        pages.len(),
        config.sections.len()
    );

    Ok(report)
}
