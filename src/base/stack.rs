//! LIFO of effective base URIs for one parse or serialize session.

use crate::error::{Error, Result};
use crate::uri::{Uri, merge};

/// A base pushed by an element carrying an override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseEntry {
    /// Always absolute.
    pub uri: Uri,
    /// Element depth that opened this entry (root element = 1).
    pub depth: usize,
}

/// Stack of effective base URIs.
///
/// The root base is seeded before the first event and never popped; every
/// element that declares an override pushes exactly one entry and pops it on
/// its matching end. The top is the effective base at the current depth.
#[derive(Debug, Clone, Default)]
pub struct BaseStack {
    root: Option<Uri>,
    entries: Vec<BaseEntry>,
}

impl BaseStack {
    /// Create a stack seeded with an absolute document base.
    pub fn new(root: Uri) -> Result<Self> {
        if !root.is_absolute() {
            return Err(Error::UnboundBase(root.to_string()));
        }
        Ok(Self {
            root: Some(root),
            entries: Vec::new(),
        })
    }

    /// Create a stack with no document base.
    ///
    /// Only absolute overrides can be pushed until one is in scope.
    pub const fn unbound() -> Self {
        Self {
            root: None,
            entries: Vec::new(),
        }
    }

    /// The effective base: top entry, else the root.
    pub fn current(&self) -> Option<&Uri> {
        self.entries
            .last()
            .map(|entry| &entry.uri)
            .or(self.root.as_ref())
    }

    /// The document base this stack was seeded with.
    pub const fn root(&self) -> Option<&Uri> {
        self.root.as_ref()
    }

    /// Resolve `value` against the current base and push the result.
    pub fn push(&mut self, value: &str, depth: usize) -> Result<&Uri> {
        let uri = match self.current() {
            Some(base) => merge(base, value)?,
            None => {
                let uri = Uri::parse(value)?;
                if !uri.is_absolute() {
                    return Err(Error::Unresolvable(value.to_string()));
                }
                uri.normalized()
            }
        };

        crate::debug!("base"; "push {} at depth {}", uri, depth);
        self.entries.push(BaseEntry { uri, depth });
        Ok(&self.entries[self.entries.len() - 1].uri)
    }

    /// Pop the entry opened at `depth`.
    ///
    /// The root is never popped: an empty entry list is an underflow, and a
    /// top entry from another depth means push/pop got out of step.
    pub fn pop(&mut self, depth: usize) -> Result<BaseEntry> {
        let top = self
            .entries
            .last()
            .ok_or(Error::StackUnderflow { depth })?;
        if top.depth != depth {
            return Err(Error::ScopeMismatch {
                expected: top.depth,
                found: depth,
            });
        }

        let entry = self.entries.pop().ok_or(Error::StackUnderflow { depth })?;
        crate::debug!("base"; "pop {} at depth {}", entry.uri, depth);
        Ok(entry)
    }

    /// Number of pushed entries, excluding the root.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BaseEntry] {
        &self.entries
    }
}
