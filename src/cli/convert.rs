//! `llmstxt convert`: print the Markdown of one HTML file.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result, bail};

use super::{Cli, ConvertArgs, load_config};
use crate::config::parse_site_url;
use crate::page::PageMeta;
use crate::pipeline::{PageAddress, PageTransformer};

/// Entry point of the `convert` command.
pub fn run(cli: &Cli, args: &ConvertArgs) -> Result<()> {
    let base_url = match &args.base_url {
        Some(url) => url.clone(),
        None => load_config(cli)?
            .and_then(|config| config.site_url)
            .context("no base URL: pass --base-url or set site_url in llmstxt.toml")?,
    };

    let html = if args.file.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file.display()))?
    };

    print!("{}", convert_html(&html, &base_url, &args.dir, !args.no_autoclean)?);
    Ok(())
}

/// Convert one HTML fragment located at `dir` of the site at `base_url`.
pub fn convert_html(html: &str, base_url: &str, dir: &str, autoclean: bool) -> Result<String> {
    let Some(base) = parse_site_url(base_url) else {
        bail!("`{base_url}` is not an absolute URL");
    };

    let dir = dir.trim_matches('/');
    let dest_uri = if dir.is_empty() {
        "index.html".to_string()
    } else {
        format!("{dir}/index.html")
    };
    let page = PageMeta::new(crate::page::src_uri_for(&dest_uri), dest_uri, None);
    let address = PageAddress::from_url(base, page.current_dir());

    PageTransformer::new(autoclean).transform(html, &address, &page)
}
