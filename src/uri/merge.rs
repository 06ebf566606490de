//! Reference resolution (RFC 3986 section 5.2).

use super::Uri;
use crate::error::{Error, Result};

/// Resolve `reference` against an absolute `base`.
///
/// Examples:
/// - base="http://x/a/b", ref="c" -> "http://x/a/c"
/// - base="http://x/a/", ref="../c" -> "http://x/c"
/// - base="http://x/a/b", ref="" -> "http://x/a/b"
pub fn merge(base: &Uri, reference: &str) -> Result<Uri> {
    if !base.is_absolute() {
        return Err(Error::UnboundBase(base.to_string()));
    }
    let reference = Uri::parse(reference)?;
    merge_uri(base, &reference)
}

/// Resolve an already-parsed reference against an absolute `base`.
pub fn merge_uri(base: &Uri, reference: &Uri) -> Result<Uri> {
    if !base.is_absolute() {
        return Err(Error::UnboundBase(base.to_string()));
    }

    if reference.is_absolute() {
        return Ok(reference.normalized());
    }

    let fragment = reference.fragment.clone();

    if reference.authority.is_some() {
        return Ok(Uri::from_parts(
            base.scheme.clone(),
            reference.authority.clone(),
            remove_dot_segments(&reference.path),
            reference.query.clone(),
            fragment,
        ));
    }

    let (path, query) = if reference.path.is_empty() {
        let query = reference.query.clone().or_else(|| base.query.clone());
        (base.path.clone(), query)
    } else if reference.path.starts_with('/') {
        (remove_dot_segments(&reference.path), reference.query.clone())
    } else {
        let merged = merge_paths(base, &reference.path);
        (remove_dot_segments(&merged), reference.query.clone())
    };

    Ok(Uri::from_parts(
        base.scheme.clone(),
        base.authority.clone(),
        path,
        query,
        fragment,
    ))
}

/// Base directory (through its last `/`) joined with a relative path.
fn merge_paths(base: &Uri, relative: &str) -> String {
    if base.authority.is_some() && base.path.is_empty() {
        return format!("/{relative}");
    }
    match base.path.rfind('/') {
        Some(idx) => format!("{}{relative}", &base.path[..=idx]),
        None => relative.to_string(),
    }
}

/// Remove `.` and `..` segments (RFC 3986 section 5.2.4).
///
/// `..` never climbs above the path root.
pub(crate) fn remove_dot_segments(path: &str) -> String {
    let mut input = path;
    let mut output = String::with_capacity(path.len());

    while !input.is_empty() {
        if let Some(rest) = input.strip_prefix("../") {
            input = rest;
        } else if let Some(rest) = input.strip_prefix("./") {
            input = rest;
        } else if input.starts_with("/./") {
            input = &input[2..];
        } else if input == "/." {
            input = "/";
        } else if input.starts_with("/../") {
            input = &input[3..];
            pop_segment(&mut output);
        } else if input == "/.." {
            input = "/";
            pop_segment(&mut output);
        } else if input == "." || input == ".." {
            input = "";
        } else {
            let start = usize::from(input.starts_with('/'));
            let end = input[start..].find('/').map_or(input.len(), |i| i + start);
            output.push_str(&input[..end]);
            input = &input[end..];
        }
    }

    output
}

fn pop_segment(output: &mut String) {
    match output.rfind('/') {
        Some(idx) => output.truncate(idx),
        None => output.clear(),
    }
}
