//! Element start/end glue keeping the base stack in step with the document.

use smallvec::SmallVec;

use super::BaseStack;
use crate::error::{Error, Result};
use crate::uri::Uri;

/// Depth counter plus one flag per open element: did it push a base?
///
/// Works on a flat callback sequence, so any event source that reports
/// balanced start/end events can drive it.
#[derive(Debug, Clone)]
pub struct BaseTracker {
    stack: BaseStack,
    owns_entry: SmallVec<[bool; 16]>,
}

impl BaseTracker {
    pub fn new(stack: BaseStack) -> Self {
        Self {
            stack,
            owns_entry: SmallVec::new(),
        }
    }

    /// Element start. `xml_base` is the element's override attribute, if any.
    ///
    /// A rejected override still opens the depth (without an entry), so a
    /// caller that skips the error keeps start/end balanced.
    pub fn enter(&mut self, xml_base: Option<&str>) -> Result<()> {
        let depth = self.depth() + 1;
        let Some(value) = xml_base else {
            self.owns_entry.push(false);
            return Ok(());
        };

        match self.stack.push(value, depth) {
            Ok(_) => {
                self.owns_entry.push(true);
                Ok(())
            }
            Err(err) => {
                self.owns_entry.push(false);
                Err(err)
            }
        }
    }

    /// Element end: pops the base if this depth pushed one.
    pub fn leave(&mut self) -> Result<()> {
        let depth = self.depth();
        let owns = self.owns_entry.pop().ok_or(Error::UnbalancedEnd)?;
        if owns {
            self.stack.pop(depth)?;
        }
        Ok(())
    }

    /// Number of currently open elements.
    #[inline]
    pub fn depth(&self) -> usize {
        self.owns_entry.len()
    }

    /// Effective base at the current depth.
    #[inline]
    pub fn current(&self) -> Option<&Uri> {
        self.stack.current()
    }

    pub const fn stack(&self) -> &BaseStack {
        &self.stack
    }

    /// Finish the session, requiring every element to be closed.
    pub fn finish(self) -> Result<BaseStack> {
        if self.depth() != 0 {
            return Err(Error::Structure(format!(
                "{} element(s) still open at end of document",
                self.depth()
            )));
        }
        Ok(self.stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(root: &str) -> BaseTracker {
        BaseTracker::new(BaseStack::new(Uri::parse(root).unwrap()).unwrap())
    }

    fn current(tracker: &BaseTracker) -> String {
        tracker.current().unwrap().to_string()
    }

    /// `A(base=U1) > B > C(base=U2) > D`, then a sibling of C.
    #[test]
    fn test_nested_overrides() {
        let mut t = tracker("http://x/doc.xspf");

        t.enter(Some("http://u1/a/")).unwrap(); // A
        t.enter(None).unwrap(); // B
        assert_eq!(current(&t), "http://u1/a/");

        t.enter(Some("http://u2/c/")).unwrap(); // C
        t.enter(None).unwrap(); // D
        assert_eq!(current(&t), "http://u2/c/");
        assert_eq!(t.depth(), 4);

        t.leave().unwrap(); // /D
        t.leave().unwrap(); // /C
        t.enter(None).unwrap(); // sibling of C
        assert_eq!(current(&t), "http://u1/a/");
        t.leave().unwrap();

        t.leave().unwrap(); // /B
        t.leave().unwrap(); // /A
        assert_eq!(current(&t), "http://x/doc.xspf");
        assert!(t.finish().unwrap().is_empty());
    }

    #[test]
    fn test_relative_overrides_chain() {
        let mut t = tracker("http://x/lists/doc.xspf");
        t.enter(Some("media/")).unwrap();
        t.enter(Some("rock/")).unwrap();
        assert_eq!(current(&t), "http://x/lists/media/rock/");
        t.leave().unwrap();
        assert_eq!(current(&t), "http://x/lists/media/");
    }

    #[test]
    fn test_no_override_uses_bootstrap_base() {
        let mut t = tracker("http://x/doc.xspf");
        for _ in 0..20 {
            t.enter(None).unwrap();
            assert_eq!(current(&t), "http://x/doc.xspf");
        }
        for _ in 0..20 {
            t.leave().unwrap();
        }
        assert_eq!(t.stack().len(), 0);
    }

    #[test]
    fn test_pop_only_at_owning_depth() {
        let mut t = tracker("http://x/");
        t.enter(Some("a/")).unwrap();
        for _ in 0..5 {
            t.enter(None).unwrap();
        }
        for _ in 0..5 {
            t.leave().unwrap();
            assert_eq!(current(&t), "http://x/a/");
        }
        t.leave().unwrap();
        assert_eq!(current(&t), "http://x/");
    }

    #[test]
    fn test_unbalanced_end() {
        let mut t = tracker("http://x/");
        assert!(matches!(t.leave(), Err(Error::UnbalancedEnd)));
    }

    #[test]
    fn test_rejected_override_keeps_depth_balanced() {
        let mut t = tracker("http://x/");
        t.enter(Some("a/")).unwrap();
        assert!(t.enter(Some("b c/")).is_err());
        assert_eq!(t.depth(), 2);
        assert_eq!(current(&t), "http://x/a/");

        t.leave().unwrap();
        t.leave().unwrap();
        assert_eq!(current(&t), "http://x/");
    }

    #[test]
    fn test_finish_with_open_elements() {
        let mut t = tracker("http://x/");
        t.enter(None).unwrap();
        assert!(matches!(t.finish(), Err(Error::Structure(_))));
    }
}
