//! URI reference type for base-aware resolution.
//!
//! - `Uri`: parsed and validated RFC 3986 URI reference
//! - [`merge`]: relative reference + absolute base -> absolute URI
//! - [`relativize`]: absolute URI + absolute base -> shortest relative string
//!
//! Both algorithms are pure functions over immutable `Uri` values.

mod merge;
mod parse;
mod relativize;

pub use merge::{merge, merge_uri};
pub use relativize::relativize;

pub(crate) use merge::remove_dot_segments;
pub(crate) use parse::encode_illegal;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Parsed URI reference, absolute or relative.
///
/// Invariants:
/// - Every component passed the RFC 3986 character grammar
/// - The scheme is lowercase
/// - `Display` recomposes exactly the parsed components
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: Option<String>,
    authority: Option<String>,
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Uri {
    /// Parse a URI reference, rejecting illegal characters and malformed
    /// percent-encoding.
    pub fn parse(input: &str) -> Result<Self> {
        parse::parse_reference(input)
    }

    /// Parse after percent-encoding characters that may never appear
    /// unescaped (spaces, quotes, angle brackets, non-ASCII).
    pub fn parse_lenient(input: &str) -> Result<Self> {
        parse::parse_reference(&encode_illegal(input))
    }

    /// Build a `file:` URI for a local path. The path must be absolute.
    pub fn from_file_path(path: &Path) -> Result<Self> {
        let url = url::Url::from_file_path(path)
            .map_err(|()| Error::syntax(&path.display().to_string(), "not an absolute file path"))?;
        let host = url.host_str().unwrap_or_default();
        Self::parse(&format!("file://{host}{}", parse::encode_file_path(url.path())))
    }

    pub(crate) const fn from_parts(
        scheme: Option<String>,
        authority: Option<String>,
        path: String,
        query: Option<String>,
        fragment: Option<String>,
    ) -> Self {
        Self {
            scheme,
            authority,
            path,
            query,
            fragment,
        }
    }

    #[inline]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    #[inline]
    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[inline]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    #[inline]
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// A URI is absolute when it carries a scheme.
    #[inline]
    pub const fn is_absolute(&self) -> bool {
        self.scheme.is_some()
    }

    /// Check if scheme and authority both match `other`.
    pub fn same_origin(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.authority == other.authority
    }

    /// Copy of this URI with the fragment dropped.
    pub fn without_fragment(&self) -> Self {
        Self {
            fragment: None,
            ..self.clone()
        }
    }

    /// Copy with dot segments removed from the path.
    pub fn normalized(&self) -> Self {
        Self {
            path: remove_dot_segments(&self.path),
            ..self.clone()
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "//{authority}")?;
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{query}")?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{fragment}")?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for Uri {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq<str> for Uri {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for Uri {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl Serialize for Uri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
