//! RFC 3986 reference splitting and character validation.

use std::sync::LazyLock;

use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use regex::{Captures, Regex};

use super::Uri;
use crate::error::{Error, Result};

/// Component splitter from RFC 3986 Appendix B.
///
/// Groups: 1 scheme, 2 authority, 3 path, 4 query, 5 fragment.
static URI_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^:/?#]+):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?(?:#(.*))?$").unwrap()
});

/// Characters that are never legal unescaped in a URI reference.
const ILLEGAL: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Brackets are legal only inside the authority (IP literals).
const OUTSIDE_AUTHORITY: &AsciiSet = &CONTROLS.add(b'[').add(b']');

/// What `url` leaves unescaped in file paths but RFC 3986 forbids.
const FILE_PATH: &AsciiSet = &OUTSIDE_AUTHORITY.add(b'|').add(b'^');

const AUTHORITY_EXTRA: &[u8] = b":@[]";
const PATH_EXTRA: &[u8] = b":@/";
const QUERY_EXTRA: &[u8] = b":@/?";

pub(super) fn parse_reference(input: &str) -> Result<Uri> {
    let caps = URI_REFERENCE
        .captures(input)
        .ok_or_else(|| Error::syntax(input, "does not match the URI-reference grammar"))?;

    let scheme = match caps.get(1) {
        Some(m) => {
            validate_scheme(input, m.as_str())?;
            Some(m.as_str().to_ascii_lowercase())
        }
        None => None,
    };

    let authority = component(input, &caps, 2, AUTHORITY_EXTRA)?;
    let path = component(input, &caps, 3, PATH_EXTRA)?.unwrap_or_default();
    let query = component(input, &caps, 4, QUERY_EXTRA)?;
    let fragment = component(input, &caps, 5, QUERY_EXTRA)?;

    Ok(Uri::from_parts(scheme, authority, path, query, fragment))
}

/// Percent-encode characters listed in [`ILLEGAL`] plus all non-ASCII,
/// and brackets everywhere after the authority.
pub(crate) fn encode_illegal(input: &str) -> String {
    let encoded = utf8_percent_encode(input, ILLEGAL).to_string();
    let authority_end = URI_REFERENCE
        .captures(&encoded)
        .and_then(|caps| caps.get(2))
        .map_or(0, |m| m.end());
    let (head, tail) = encoded.split_at(authority_end);
    format!("{head}{}", utf8_percent_encode(tail, OUTSIDE_AUTHORITY))
}

/// Escape the characters a `url`-built file path may still carry raw.
pub(crate) fn encode_file_path(path: &str) -> String {
    utf8_percent_encode(path, FILE_PATH).to_string()
}

fn component(input: &str, caps: &Captures<'_>, group: usize, extra: &[u8]) -> Result<Option<String>> {
    match caps.get(group) {
        Some(m) => {
            validate_chars(input, m.as_str(), m.start(), extra)?;
            Ok(Some(m.as_str().to_string()))
        }
        None => Ok(None),
    }
}

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
fn validate_scheme(input: &str, scheme: &str) -> Result<()> {
    let mut bytes = scheme.bytes();
    let starts_alpha = bytes.next().is_some_and(|b| b.is_ascii_alphabetic());
    if !starts_alpha || !bytes.all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.')) {
        return Err(Error::syntax(input, format!("invalid scheme `{scheme}`")));
    }
    Ok(())
}

fn validate_chars(input: &str, part: &str, offset: usize, extra: &[u8]) -> Result<()> {
    let bytes = part.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                    i += 3;
                    continue;
                }
                _ => {
                    return Err(Error::syntax(
                        input,
                        format!("malformed percent-encoding at offset {}", offset + i),
                    ));
                }
            }
        }
        if !(is_unreserved(b) || is_sub_delim(b) || extra.contains(&b)) {
            // Every accepted byte so far was ASCII, so `i` is a char boundary.
            let ch = part[i..].chars().next().unwrap_or('?');
            return Err(Error::syntax(
                input,
                format!("illegal character {ch:?} at offset {}", offset + i),
            ));
        }
        i += 1;
    }
    Ok(())
}

#[inline]
const fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~')
}

#[inline]
const fn is_sub_delim(b: u8) -> bool {
    matches!(
        b,
        b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
    )
}
