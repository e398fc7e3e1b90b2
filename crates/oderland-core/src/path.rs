//! Path sanitization and the cache mirroring rule.

use std::path::{Path, PathBuf};

use crate::error::{OderError, Result};

/// Normalizes a user-supplied path relative to a document root.
///
/// Leading and trailing slash runs are stripped and internal runs collapse to
/// a single separator. Any `.` or `..` segment is rejected, as is a path that
/// resolves to an existing regular file — migration only ever targets
/// directories. Pure apart from the final file-type probe.
pub fn sanitize_rel_path(raw: &str, docroot: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for segment in raw.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment == "." || segment == ".." {
            return Err(OderError::InvalidPath {
                path: raw.to_string(),
                reason: "'.' and '..' segments are not allowed".to_string(),
            });
        }
        segments.push(segment);
    }
    if segments.is_empty() {
        return Err(OderError::InvalidPath {
            path: raw.to_string(),
            reason: "path is empty".to_string(),
        });
    }
    let rel = segments.join("/");

    let resolved = docroot.join(&rel);
    if resolved.is_file() {
        return Err(OderError::InvalidPath {
            path: raw.to_string(),
            reason: format!("{} is a regular file, not a directory", resolved.display()),
        });
    }
    Ok(rel)
}

/// Strips the account home from a document root.
///
/// In this hosting layout the home directory is always `/home/<user>`, so the
/// home-relative path is the docroot with its first three slash-separated
/// segments removed (the empty segment before the leading slash counts).
/// Mirrored cache paths are keyed on this value; changing the depth here
/// would orphan every previously migrated directory.
pub fn home_relative(docroot: &Path) -> Result<PathBuf> {
    let raw = docroot.to_string_lossy();
    if !raw.starts_with('/') {
        return Err(OderError::InvalidPath {
            path: raw.into_owned(),
            reason: "document root must be an absolute path".to_string(),
        });
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() <= 3 {
        return Err(OderError::InvalidPath {
            path: raw.into_owned(),
            reason: "document root is not inside an account home".to_string(),
        });
    }
    Ok(PathBuf::from(parts[3..].join("/")))
}
