//! Rewrite command implementation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use xspf::Uri;
use xspf::config::XspfConfig;
use xspf::log;
use xspf::xspf::{read_file, write_file, write_string};

use super::args::RewriteArgs;
use super::resolve::report_skipped;

pub fn run_rewrite(args: &RewriteArgs, config: &XspfConfig) -> Result<()> {
    let read = args.read.apply(&config.read);
    let outcome = read_file(&args.input, read.base.clone(), &read.options())
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    report_skipped(&args.input, &outcome);

    let write = args.apply(&config.write);
    let fallback = match &args.output {
        Some(path) => Some(output_location(path)?),
        None => None,
    };
    let options = write.options(fallback);

    match &args.output {
        Some(path) => {
            write_file(&outcome.playlist, path, &options)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log!("rewrite"; "{} -> {}", args.input.display(), path.display());
        }
        None => print!("{}", write_string(&outcome.playlist, &options)?),
    }
    Ok(())
}

/// `file:` URI of an output path that may not exist yet.
fn output_location(path: &Path) -> Result<Uri> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let dir = fs::canonicalize(parent)
        .with_context(|| format!("output directory {} does not exist", parent.display()))?;
    let name = path.file_name().context("output path has no file name")?;
    Ok(Uri::from_file_path(&dir.join(name))?)
}
