//! Error types shared by the URI algorithms, the base stack and the XSPF codec.

use thiserror::Error;

/// Errors produced while resolving, tracking or (de)serializing references.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid URI syntax in `{input}`: {reason}")]
    InvalidUriSyntax { input: String, reason: String },

    #[error("base URI `{0}` is not absolute")]
    UnboundBase(String),

    #[error("no base URI in scope to resolve `{0}`")]
    Unresolvable(String),

    #[error("base URI stack underflow at depth {depth}")]
    StackUnderflow { depth: usize },

    #[error("base URI scope mismatch: top entry opened at depth {expected}, closing depth {found}")]
    ScopeMismatch { expected: usize, found: usize },

    #[error("element end without matching element start")]
    UnbalancedEnd,

    #[error("malformed XML at byte {position}")]
    Malformed {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid playlist structure: {0}")]
    Structure(String),

    #[error("invalid value in <{element}>: {reason}")]
    InvalidField { element: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    pub(crate) fn syntax(input: &str, reason: impl Into<String>) -> Self {
        Self::InvalidUriSyntax {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Field-level failures a document reader may choose to skip.
    ///
    /// Everything else is either an I/O failure or a broken invariant
    /// of the tracker and aborts the session.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidUriSyntax { .. } | Self::Unresolvable(_) | Self::InvalidField { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
