//! Base-URI aware reading and writing of XSPF playlists.
//!
//! References in a playlist are resolved against the `xml:base` in scope
//! where they appear, falling back to the document's own location; on
//! output they are relativized back against the destination.
//!
//! - [`uri`]: RFC 3986 parsing, [`merge`](uri::merge) and [`relativize`](uri::relativize)
//! - [`base`]: the base stack and the element start/end tracker driving it
//! - [`session`]: per-document read and write facades
//! - [`xspf`]: playlist model, reader and writer
//! - [`config`]: `xspf.toml` loading

pub mod base;
pub mod config;
pub mod error;
pub mod logger;
pub mod session;
pub mod uri;
pub mod xspf;

pub use error::{Error, Result};
pub use session::{
    ReadSession, ResolveOptions, ResolvedReference, UnresolvedPolicy, WriteSession,
    to_output_string,
};
pub use uri::Uri;
