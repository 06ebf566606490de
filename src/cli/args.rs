//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;
use xspf::Uri;
use xspf::config::{ReadConfig, WriteConfig};
use xspf::session::UnresolvedPolicy;
use xspf::xspf::InvalidFieldPolicy;

/// Resolve and rewrite XSPF playlists with xml:base support
#[derive(Parser, Debug, Clone)]
#[command(name = "xspf", version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: xspf.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Print base stack and resolution details to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve playlists and print them as JSON
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Rewrite a playlist with URIs relative to its output location
    #[command(visible_alias = "w")]
    Rewrite {
        #[command(flatten)]
        args: RewriteArgs,
    },

    /// Resolve a URI reference against an absolute base
    Merge {
        base: String,
        reference: String,
    },

    /// Express an absolute URI relative to an absolute base
    Relativize {
        base: String,
        target: String,
    },
}

/// Options shared by commands that read playlists.
#[derive(clap::Args, Debug, Clone)]
pub struct ReadArgs {
    /// Document base to use instead of the file location
    #[arg(short, long)]
    pub base: Option<Uri>,

    /// Keep relative references when no base is in scope
    #[arg(long)]
    pub keep_relative: bool,

    /// Skip fields that fail to resolve instead of aborting
    #[arg(long)]
    pub skip_invalid: bool,

    /// Percent-encode illegal characters before resolving
    #[arg(long)]
    pub lenient: bool,
}

impl ReadArgs {
    /// Apply CLI overrides on top of the `[read]` section.
    pub fn apply(&self, config: &ReadConfig) -> ReadConfig {
        let mut config = config.clone();
        if let Some(base) = &self.base {
            config.base = Some(base.clone());
        }
        if self.keep_relative {
            config.unresolved = UnresolvedPolicy::KeepRelative;
        }
        if self.skip_invalid {
            config.invalid_field = InvalidFieldPolicy::Skip;
        }
        config.lenient |= self.lenient;
        config
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Playlist files
    #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub read: ReadArgs,

    /// Pretty-print the JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RewriteArgs {
    /// Playlist to read
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub read: ReadArgs,

    /// Base to relativize against instead of the output location
    #[arg(long)]
    pub output_base: Option<Uri>,

    /// Emit the output base as a root xml:base attribute
    #[arg(long)]
    pub xml_base: bool,

    /// Spaces per nesting level (0 for a single line)
    #[arg(long)]
    pub indent: Option<usize>,
}

impl RewriteArgs {
    /// Apply CLI overrides on top of the `[write]` section.
    pub fn apply(&self, config: &WriteConfig) -> WriteConfig {
        let mut config = config.clone();
        if let Some(base) = &self.output_base {
            config.base = Some(base.clone());
        }
        config.xml_base |= self.xml_base;
        if let Some(indent) = self.indent {
            config.indent = indent;
        }
        config
    }
}
