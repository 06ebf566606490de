//! Effective base URI tracking.
//!
//! - `BaseStack`: LIFO of absolute bases, seeded with the document base
//! - `BaseTracker`: element start/end glue deciding when to push and pop

mod stack;
mod tracker;

pub use stack::{BaseEntry, BaseStack};
pub use tracker::BaseTracker;
