//! `merge` and `relativize` commands.

use anyhow::{Context, Result};
use xspf::Uri;
use xspf::uri::{merge, relativize};

pub fn run_merge(base: &str, reference: &str) -> Result<()> {
    println!("{}", merge_command(base, reference)?);
    Ok(())
}

pub fn run_relativize(base: &str, target: &str) -> Result<()> {
    println!("{}", relativize_command(base, target)?);
    Ok(())
}

fn merge_command(base: &str, reference: &str) -> Result<String> {
    let base = Uri::parse(base).context("invalid base")?;
    Ok(merge(&base, reference)?.to_string())
}

fn relativize_command(base: &str, target: &str) -> Result<String> {
    let base = Uri::parse(base).context("invalid base")?;
    let target = Uri::parse(target).context("invalid target")?;
    Ok(relativize(&base, &target))
}
