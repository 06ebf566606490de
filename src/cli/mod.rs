//! Command-line interface module.

mod args;
pub mod resolve;
pub mod rewrite;
pub mod uri;

pub use args::{Cli, Commands};
