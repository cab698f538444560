//! Path manipulation utilities for tmpl
//!
//! Two kinds of paths flow through the crate:
//!
//! - **Virtual paths** are `/`-separated strings in the unified namespace that
//!   templates see. They are independent of the host platform.
//! - **Real paths** are host filesystem paths (`PathBuf`) backing a mount.
//!
//! Both are cleaned lexically; no symlinks are resolved.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::Result;

/// Separator used by virtual paths.
pub const SEPARATOR: char = '/';

/// Glob options shared by every virtual path query: wildcards never match a
/// separator, so `/target/*` only lists direct children of `/target`.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Returns true if the virtual path is absolute.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// Lexically clean a virtual path.
///
/// Collapses repeated separators, removes `.` segments and resolves `..`
/// against the preceding segment. `..` at the root of an absolute path is
/// dropped. An empty result becomes `.` (or `/` for absolute paths).
pub fn clean(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }

    let rooted = is_absolute(path);
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !rooted {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Join a virtual path onto a base and clean the result.
pub fn join(base: &str, path: &str) -> String {
    if base.is_empty() {
        return clean(path);
    }
    clean(&format!("{}/{}", base, path))
}

/// The directory portion of a virtual path, cleaned.
pub fn parent(path: &str) -> String {
    match path.rfind(SEPARATOR) {
        Some(0) => "/".to_string(),
        Some(idx) => clean(&path[..idx]),
        None => ".".to_string(),
    }
}

/// Strip `root` from the front of a virtual path at a segment boundary.
///
/// Returns the remainder without a leading separator, or `None` if `path` is
/// not `root` itself or a descendant of it.
pub fn strip_root<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    if path == root {
        return Some("");
    }
    if root == "/" {
        return path.strip_prefix(SEPARATOR);
    }
    path.strip_prefix(root)?.strip_prefix(SEPARATOR)
}

/// Returns true if the string ends with a path separator.
///
/// Mount specs use a trailing separator to express directory intent.
pub fn has_trailing_separator(path: &str) -> bool {
    path.chars().last().is_some_and(std::path::is_separator)
}

/// Make a real path absolute against the working directory and clean it.
pub fn absolutize(path: &Path) -> Result<PathBuf> {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    Ok(clean_real(&path))
}

/// Lexically clean a real path, resolving `.` and `..` components.
pub fn clean_real(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_root = cleaned.has_root() && cleaned.parent().is_none();
                if !at_root && !cleaned.pop() {
                    cleaned.push(component);
                }
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}

/// Compile a glob pattern for matching virtual paths.
pub fn compile_glob(pattern: &str) -> Result<Pattern> {
    Ok(Pattern::new(pattern)?)
}

/// Match a virtual path against a compiled glob pattern.
pub fn glob_matches(pattern: &Pattern, path: &str) -> bool {
    pattern.matches_with(path, MATCH_OPTIONS)
}

/// Match a virtual path against a glob pattern
pub fn glob_match(pattern: &str, path: &str) -> Result<bool> {
    Ok(glob_matches(&compile_glob(pattern)?, path))
}
