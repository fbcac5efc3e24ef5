//! llmstxt - generate llms.txt files from a built documentation site.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use llmstxt::cli::{self, Cli, Commands};
use llmstxt::config::ConfigError;
use llmstxt::log;

fn main() {
    if let Err(err) = run() {
        // Diagnostics already carry their own formatting
        match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => eprintln!("{diag}"),
            _ => log!("error"; "{:#}", err),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    llmstxt::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Build { build_args } => cli::build::run(&cli, build_args).map(|_| ()),
        Commands::Convert { args } => cli::convert::run(&cli, args),
    }
}
