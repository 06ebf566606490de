//! Inverse of [`merge`](super::merge): shortest relative form of an absolute URI.

use super::{Uri, remove_dot_segments};

/// Express `target` relative to `base`.
///
/// Falls back to the absolute form of `target` when no relative form can
/// reproduce it: different scheme or authority, non-hierarchical paths,
/// or an empty target path below a non-empty base path.
///
/// Examples:
/// - base="http://x/a/b", target="http://x/a/c" -> "c"
/// - base="http://x/a/b/c", target="http://x/a/d" -> "../d"
/// - base="http://x/a", target="ftp://x/a" -> "ftp://x/a"
pub fn relativize(base: &Uri, target: &Uri) -> String {
    if !base.is_absolute() || !target.is_absolute() || !base.same_origin(target) {
        return target.to_string();
    }

    let base_path = remove_dot_segments(base.path());
    let target_path = remove_dot_segments(target.path());

    if base_path == target_path {
        if target.query() == base.query() {
            return suffix(None, target.fragment());
        }
        if target.query().is_some() {
            return suffix(target.query(), target.fragment());
        }
        // Base carries a query the target lacks: only a path reference drops it.
    }

    match relative_path(&base_path, &target_path, base.authority().is_some()) {
        Some(path) => path + &suffix(target.query(), target.fragment()),
        None => target.to_string(),
    }
}

/// Segment-wise path difference, or `None` for non-hierarchical paths.
fn relative_path(base_path: &str, target_path: &str, has_authority: bool) -> Option<String> {
    // An authority with an empty path behaves as the root directory.
    let base_path = if has_authority && base_path.is_empty() {
        "/"
    } else {
        base_path
    };
    let base_rest = base_path.strip_prefix('/')?;
    let target_rest = target_path.strip_prefix('/')?;

    let mut base_dirs: Vec<&str> = base_rest.split('/').collect();
    base_dirs.pop();

    let target_segments: Vec<&str> = target_rest.split('/').collect();
    let target_dirs = &target_segments[..target_segments.len() - 1];

    let common = base_dirs
        .iter()
        .zip(target_dirs)
        .take_while(|(base, target)| base == target)
        .count();
    let ups = base_dirs.len() - common;
    let rest = target_segments[common..].join("/");

    let mut path = "../".repeat(ups);
    if ups == 0 && needs_dot_prefix(&rest) {
        path.push_str("./");
    }
    path.push_str(&rest);

    if path.is_empty() {
        path.push_str("./");
    }
    Some(path)
}

/// A leading `:` segment would parse as a scheme, a leading `/` as a
/// root-relative path or an authority.
fn needs_dot_prefix(rest: &str) -> bool {
    rest.starts_with('/') || rest.split('/').next().is_some_and(|first| first.contains(':'))
}

fn suffix(query: Option<&str>, fragment: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(query) = query {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}
