//! `[read]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [read]
//! base = "http://example.com/lists/"   # Overrides the document location
//! unresolved = "reject"                # or "keep-relative"
//! invalid-field = "abort"              # or "skip"
//! lenient = false                      # Percent-encode illegal characters first
//! ```

use serde::{Deserialize, Serialize};

use crate::session::{ResolveOptions, UnresolvedPolicy};
use crate::uri::Uri;
use crate::xspf::{InvalidFieldPolicy, ReadOptions};

/// Settings applied to every document read.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReadConfig {
    /// Document base used instead of each file's own location.
    pub base: Option<Uri>,

    /// Relative references with no base in scope.
    pub unresolved: UnresolvedPolicy,

    /// Fields that fail to resolve or parse.
    pub invalid_field: InvalidFieldPolicy,

    pub lenient: bool,
}

impl ReadConfig {
    pub fn options(&self) -> ReadOptions {
        ReadOptions {
            resolve: ResolveOptions {
                unresolved: self.unresolved,
                lenient: self.lenient,
            },
            invalid_field: self.invalid_field,
        }
    }
}
