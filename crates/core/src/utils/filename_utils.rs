//! Filename normalization for user-supplied document names.

use std::path::{Component, Path, PathBuf};

use crate::errors::{Error, Result};

/// Normalizes arbitrary text into a path-safe name.
///
/// Apostrophes (plain and curly) become `-`, spaces become `_`, and anything
/// outside `[A-Za-z0-9_\-./]` is dropped. The result may be empty, in which
/// case the caller should fall back to a default name.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '\u{2019}' | '\u{2018}' | '\'' => '-',
            ' ' => '_',
            other => other,
        })
        .filter(|c| is_allowed(*c))
        .collect()
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// Joins `relative` under `root`, refusing anything that would land outside it.
///
/// Sanitized names may still contain `/` and `..`, so every component must be
/// a plain segment. Segments starting with `.` are reserved for internal files
/// such as the session store. Empty names are rejected as well.
pub fn resolve_relative_path(root: &Path, relative: &str) -> Result<PathBuf> {
    let mut resolved = root.to_path_buf();
    let mut segments = 0usize;
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(segment) => {
                if segment.to_string_lossy().starts_with('.') {
                    return Err(Error::Validation(format!(
                        "Path '{}' names a hidden file",
                        relative
                    )));
                }
                resolved.push(segment);
                segments += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(Error::Validation(format!(
                    "Path '{}' escapes the document root",
                    relative
                )));
            }
        }
    }
    if segments == 0 {
        return Err(Error::Validation("Path must not be empty".to_string()));
    }
    Ok(resolved)
}

/// Checks a slash-separated remote repository path.
///
/// `.` and `..` segments are refused; URL normalization would otherwise move
/// the request off the contents endpoint. Empty segments are ignored.
pub fn check_remote_path(path: &str) -> Result<()> {
    let mut segments = 0usize;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(Error::Validation(format!(
                "Path '{}' contains a relative segment",
                path
            )));
        }
        segments += 1;
    }
    if segments == 0 {
        return Err(Error::Validation("Path must not be empty".to_string()));
    }
    Ok(())
}

/// Last segment of a slash-separated remote path.
pub fn remote_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
