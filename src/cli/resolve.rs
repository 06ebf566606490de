//! Resolve command implementation.
//!
//! Reads playlists in parallel, one session per file, and prints the
//! resolved model as JSON on stdout.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use rayon::prelude::*;
use serde::Serialize;
use xspf::config::{ReadConfig, XspfConfig};
use xspf::log;
use xspf::xspf::{ReadOutcome, read_file};

use super::args::ResolveArgs;

#[derive(Debug, Serialize)]
pub struct ResolvedFile {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: ReadOutcome,
}

#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
}

/// Result for a single playlist
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FileResult {
    Resolved(ResolvedFile),
    Failed(FailedFile),
}

impl FileResult {
    const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

pub fn run_resolve(args: &ResolveArgs, config: &XspfConfig) -> Result<()> {
    let read = args.read.apply(&config.read);
    let results = resolve_files(&args.files, &read);

    let output = if args.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{output}");

    let failed = results.iter().filter(|r| r.is_failed()).count();
    if failed > 0 {
        bail!("{failed} of {} playlists failed to resolve", results.len());
    }
    Ok(())
}

/// Resolve every file independently, keeping input order.
pub fn resolve_files(files: &[PathBuf], read: &ReadConfig) -> Vec<FileResult> {
    let options = read.options();
    files
        .par_iter()
        .map(|path| match read_file(path, read.base.clone(), &options) {
            Ok(outcome) => {
                report_skipped(path, &outcome);
                FileResult::Resolved(ResolvedFile {
                    path: path.clone(),
                    outcome,
                })
            }
            Err(err) => {
                log!("error"; "{}: {}", path.display(), err);
                FileResult::Failed(FailedFile {
                    path: path.clone(),
                    error: err.to_string(),
                })
            }
        })
        .collect()
}

pub(super) fn report_skipped(path: &Path, outcome: &ReadOutcome) {
    for skipped in &outcome.skipped {
        log!("warning"; "{}: skipped <{}>: {}", path.display(), skipped.element, skipped.reason);
    }
}
