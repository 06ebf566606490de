//! Resolution and serialization facades.
//!
//! A `ReadSession` owns the base tracker for one document being parsed and
//! resolves field values at the current parse position. A `WriteSession`
//! does the inverse for one document being written.

use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::base::{BaseStack, BaseTracker};
use crate::error::{Error, Result};
use crate::uri::{Uri, encode_illegal, merge_uri, relativize};

/// What to do with a relative reference when no base is in scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnresolvedPolicy {
    /// Fail with [`Error::Unresolvable`].
    #[default]
    Reject,
    /// Keep the reference as written.
    KeepRelative,
}

/// Options shared by every resolution in a read session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOptions {
    pub unresolved: UnresolvedPolicy,
    /// Percent-encode illegal characters before parsing field values.
    pub lenient: bool,
}

/// The resolved value of one field occurrence.
///
/// Absolute unless it was produced under [`UnresolvedPolicy::KeepRelative`]
/// without a base in scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedReference(Uri);

impl ResolvedReference {
    pub const fn as_uri(&self) -> &Uri {
        &self.0
    }

    pub fn into_uri(self) -> Uri {
        self.0
    }
}

impl Deref for ResolvedReference {
    type Target = Uri;

    fn deref(&self) -> &Uri {
        &self.0
    }
}

impl fmt::Display for ResolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl PartialEq<str> for ResolvedReference {
    fn eq(&self, other: &str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for ResolvedReference {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<ResolvedReference> for Uri {
    fn from(reference: ResolvedReference) -> Self {
        reference.0
    }
}

// ============================================================================
// Read path
// ============================================================================

/// One document parse: base tracking plus field resolution.
#[derive(Debug, Clone)]
pub struct ReadSession {
    tracker: BaseTracker,
    options: ResolveOptions,
}

impl ReadSession {
    /// Start a session. `base` is the document's retrieval location or a
    /// caller override; `None` starts unbound.
    pub fn new(base: Option<Uri>, options: ResolveOptions) -> Result<Self> {
        let stack = match base {
            Some(base) => BaseStack::new(base)?,
            None => BaseStack::unbound(),
        };
        Ok(Self {
            tracker: BaseTracker::new(stack),
            options,
        })
    }

    /// Element start with its `xml:base` value, if present.
    pub fn start_element(&mut self, xml_base: Option<&str>) -> Result<()> {
        let xml_base = xml_base.map(|value| self.prepare(value));
        self.tracker.enter(xml_base.as_deref())
    }

    pub fn end_element(&mut self) -> Result<()> {
        self.tracker.leave()
    }

    /// Resolve a raw field value against the effective base.
    pub fn resolve(&self, value: &str) -> Result<ResolvedReference> {
        let value = self.prepare(value);
        let reference = Uri::parse(&value)?;

        match self.tracker.current() {
            Some(base) => Ok(ResolvedReference(merge_uri(base, &reference)?)),
            None if reference.is_absolute() => Ok(ResolvedReference(reference.normalized())),
            None => match self.options.unresolved {
                UnresolvedPolicy::Reject => Err(Error::Unresolvable(value)),
                UnresolvedPolicy::KeepRelative => {
                    crate::debug!("resolve"; "no base in scope, keeping `{}`", value);
                    Ok(ResolvedReference(reference))
                }
            },
        }
    }

    /// Effective base at the current parse position.
    pub fn effective_base(&self) -> Option<&Uri> {
        self.tracker.current()
    }

    pub fn depth(&self) -> usize {
        self.tracker.depth()
    }

    pub const fn options(&self) -> ResolveOptions {
        self.options
    }

    /// End the session; fails if elements are still open.
    pub fn finish(self) -> Result<()> {
        self.tracker.finish().map(|_| ())
    }

    fn prepare(&self, value: &str) -> String {
        let value = value.trim();
        if self.options.lenient {
            encode_illegal(value)
        } else {
            value.to_string()
        }
    }
}

// ============================================================================
// Write path
// ============================================================================

/// Relativize `absolute` against the document base for output.
pub fn to_output_string(absolute: &Uri, document_base: &Uri) -> String {
    relativize(document_base, absolute)
}

/// One document serialization.
///
/// Scopes opened with an override change the base later output is
/// relativized against, mirroring what a reader will resolve against.
#[derive(Debug, Clone)]
pub struct WriteSession {
    tracker: BaseTracker,
}

impl WriteSession {
    /// Start a session relativizing against `document_base`; `None` writes
    /// URIs in absolute form until a scope introduces a base.
    pub fn new(document_base: Option<Uri>) -> Result<Self> {
        let stack = match document_base {
            Some(base) => BaseStack::new(base)?,
            None => BaseStack::unbound(),
        };
        Ok(Self {
            tracker: BaseTracker::new(stack),
        })
    }

    /// Open an element scope, returning the `xml:base` attribute value to
    /// emit when `override_base` is given. The value is relative to the
    /// enclosing scope where possible.
    pub fn open_scope(&mut self, override_base: Option<&Uri>) -> Result<Option<String>> {
        let attribute = match (override_base, self.tracker.current()) {
            (Some(uri), Some(current)) => Some(relativize(current, uri)),
            (Some(uri), None) => Some(uri.to_string()),
            (None, _) => None,
        };
        self.tracker.enter(attribute.as_deref())?;
        Ok(attribute)
    }

    pub fn close_scope(&mut self) -> Result<()> {
        self.tracker.leave()
    }

    /// Text to emit for `uri` in the current scope.
    pub fn output(&self, uri: &Uri) -> String {
        match self.tracker.current() {
            Some(base) => to_output_string(uri, base),
            None => uri.to_string(),
        }
    }

    pub fn finish(self) -> Result<()> {
        self.tracker.finish().map(|_| ())
    }
}
