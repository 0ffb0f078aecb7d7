//! Helpers for slash-separated remote paths.
//!
//! Remote paths are always absolute. Directory paths held by the view are
//! slash-terminated (`/docs/`), node paths are not (`/docs/report.pdf`).

/// Appends a trailing `/` unless already present.
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Parent of a slash-terminated directory path (`/a/b/` -> `/a/`).
///
/// The root is its own parent.
pub fn parent_dir(dir: &str) -> String {
    let trimmed = dir.strip_suffix('/').unwrap_or(dir);
    match trimmed.rfind('/') {
        Some(idx) => trimmed[..=idx].to_string(),
        None => "/".to_string(),
    }
}

/// Text after the last `/`.
pub fn last_segment(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// Resolves `name` against the directory `dir` unless it is already absolute.
pub fn resolve(name: &str, dir: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("{dir}{name}")
    }
}

/// Whether `path` names an entry directly inside the directory `dir`.
///
/// `dir` must be slash-terminated. The directory itself is not its own child.
pub fn is_direct_child(path: &str, dir: &str) -> bool {
    match path.strip_prefix(dir) {
        Some(rest) => !rest.is_empty() && !rest.contains('/'),
        None => false,
    }
}

/// Whether `dir` is the root directory.
pub fn is_root(dir: &str) -> bool {
    dir == "/"
}
