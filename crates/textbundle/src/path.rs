//! Lexical path resolution inside a bundle root.

use crate::{BundleError, BundleResult};

/// Resolve `relative` against a bundle root.
///
/// Returns the normalized, `/`-separated path relative to the root. `.` and
/// `..` segments are folded lexically; a path that is absolute, climbs above
/// the root or resolves to the root itself is rejected with
/// [`BundleError::PathTraversal`]. `root` is only used for the error message.
pub(crate) fn resolve(relative: &str, root: &str) -> BundleResult<String> {
    let unified = relative.replace('\\', "/");
    let traversal = || BundleError::PathTraversal {
        path: relative.to_string(),
        root: root.to_string(),
    };

    if unified.starts_with('/') || has_drive_prefix(&unified) {
        return Err(traversal());
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop().ok_or_else(traversal)?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return Err(traversal());
    }
    Ok(segments.join("/"))
}

/// Join two `/`-separated relative paths, either of which may be empty.
pub(crate) fn join(base: &str, child: &str) -> String {
    match (base.is_empty(), child.is_empty()) {
        (true, _) => child.to_string(),
        (_, true) => base.to_string(),
        _ => format!("{base}/{child}"),
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
