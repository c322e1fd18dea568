//! Page title mapping.
//!
//! A content file `Setup_Guide.mediawiki` is published as the page
//! `Setup Guide`.

use std::path::Path;

/// Extension of syncable content files (without the dot).
pub const CONTENT_EXTENSION: &str = "mediawiki";

/// Derive the wiki page title from a content file name.
#[must_use]
pub fn title_for(filename: &str) -> String {
    let stem = filename
        .strip_suffix(CONTENT_EXTENSION)
        .and_then(|s| s.strip_suffix('.'))
        .unwrap_or(filename);
    stem.replace('_', " ")
}

/// Derive the page title from the final component of a path.
#[must_use]
pub fn title_for_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    title_for(&name)
}
