//! `xspf` command-line tool.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use xspf::config::XspfConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {}
    }
    xspf::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Merge { base, reference } => cli::uri::run_merge(base, reference),
        Commands::Relativize { base, target } => cli::uri::run_relativize(base, target),
        Commands::Resolve { args } => {
            let config = XspfConfig::load(cli.config.as_deref())?;
            cli::resolve::run_resolve(args, &config)
        }
        Commands::Rewrite { args } => {
            let config = XspfConfig::load(cli.config.as_deref())?;
            cli::rewrite::run_rewrite(args, &config)
        }
    }
}
