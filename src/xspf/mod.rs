//! XSPF playlist model with base-aware reading and writing.
//!
//! - [`read_str`] / [`read_file`]: parse a document, resolving every
//!   URI-bearing field against the `xml:base` in scope
//! - [`write_string`] / [`write_file`]: serialize with URIs relativized
//!   against the output location
//!
//! The model only ever holds resolved URIs; relative forms exist in the
//! document text and nowhere else.

mod reader;
mod writer;

#[cfg(test)]
mod tests;

pub use reader::{read_file, read_str};
pub use writer::{write_file, write_string};

use serde::{Deserialize, Serialize};

use crate::session::ResolveOptions;
use crate::uri::Uri;

/// Default namespace of XSPF version 1.
pub const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";

// ============================================================================
// Model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub version: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<Uri>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribution: Vec<Attribution>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metas: Vec<Meta>,
    pub tracks: Vec<Track>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            version: 1,
            title: None,
            creator: None,
            annotation: None,
            info: None,
            location: None,
            identifier: None,
            image: None,
            date: None,
            license: None,
            attribution: Vec::new(),
            links: Vec::new(),
            metas: Vec::new(),
            tracks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Track {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Uri>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Uri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_num: Option<u32>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metas: Vec<Meta>,
}

/// One entry of `<attribution>`, kept in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    Location(Uri),
    Identifier(Uri),
}

impl Attribution {
    pub const fn element_name(&self) -> &'static str {
        match self {
            Self::Location(_) => "location",
            Self::Identifier(_) => "identifier",
        }
    }

    pub const fn uri(&self) -> &Uri {
        match self {
            Self::Location(uri) | Self::Identifier(uri) => uri,
        }
    }
}

/// `<link rel="...">content</link>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub rel: Uri,
    pub content: Uri,
}

/// `<meta rel="...">text</meta>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meta {
    pub rel: Uri,
    pub content: String,
}

// ============================================================================
// Options
// ============================================================================

/// What a reader does with a field that fails to resolve or parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidFieldPolicy {
    #[default]
    Abort,
    /// Drop the field, record it in [`ReadOutcome::skipped`] and go on.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadOptions {
    pub resolve: ResolveOptions,
    pub invalid_field: InvalidFieldPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Base the output is relativized against, usually the output location.
    pub base: Option<Uri>,
    /// Emit `base` as an `xml:base` attribute on the root element.
    pub emit_xml_base: bool,
    /// Spaces per nesting level; `0` writes everything on one line.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            base: None,
            emit_xml_base: false,
            indent: 2,
        }
    }
}

// ============================================================================
// Read result
// ============================================================================

/// A field dropped under [`InvalidFieldPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedField {
    pub element: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOutcome {
    pub playlist: Playlist,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedField>,
}
