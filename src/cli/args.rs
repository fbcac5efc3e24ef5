//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Generate llms.txt, llms-full.txt and Markdown siblings from a built site
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: llmstxt.toml, searched upward)
    #[arg(short = 'C', long, default_value = "llmstxt.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print each page as it is processed
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert the built site and write the llms.txt files
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Print the Markdown of a single HTML file
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },
}

/// Build command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Built site directory (overrides `site_dir`)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub site_dir: Option<PathBuf>,

    /// Override site URL for deployment.
    ///
    /// Useful when the published URL differs from the one in llmstxt.toml,
    /// e.g. versioned documentation deployed under `/en/<version>/`.
    #[arg(long)]
    pub site_url: Option<String>,
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// HTML file to convert (`-` reads stdin)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Site base URL links are resolved against (default: `site_url` from config)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page directory relative to the site root (e.g. `guide/intro`)
    #[arg(long, default_value = "")]
    pub dir: String,

    /// Keep site chrome (skip cleaning)
    #[arg(long)]
    pub no_autoclean: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build() {
        let cli = Cli::parse_from(["llmstxt", "-v", "build", "--site-url", "https://x.org/"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("llmstxt.toml"));
        let Commands::Build { build_args } = cli.command else {
            panic!("expected build");
        };
        assert_eq!(build_args.site_url.as_deref(), Some("https://x.org/"));
        assert_eq!(build_args.site_dir, None);
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from(["llmstxt", "c", "page.html", "--dir", "guide", "--no-autoclean"]);
        let Commands::Convert { args } = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.file, PathBuf::from("page.html"));
        assert_eq!(args.dir, "guide");
        assert!(args.no_autoclean);
        assert_eq!(args.base_url, None);
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
