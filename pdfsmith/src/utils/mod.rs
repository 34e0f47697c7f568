//! Utilities for path collection and size formatting.

use std::path::PathBuf;

use crate::error::{PdfSmithError, Result};

/// Expand glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`. Patterns are expanded in the
/// order given, and matches of one pattern are sorted, so `"*.pdf"` yields
/// files in name order. A pattern without glob metacharacters that matches
/// nothing is kept as a literal path, letting later reads report it as
/// missing.
///
/// # Errors
///
/// Returns [`PdfSmithError::InvalidConfig`] for malformed patterns and
/// [`PdfSmithError::Other`] for unreadable directory entries.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern.as_ref())?);
    }

    Ok(resolved_paths)
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|err| {
        PdfSmithError::invalid_config(format!("Invalid pattern '{pattern}': {err}"))
    })?;

    let mut paths = entries
        .map(|entry| entry.map_err(|err| PdfSmithError::other(err.to_string())))
        .collect::<Result<Vec<_>>>()?;
    paths.sort();

    if paths.is_empty() && !pattern.contains(['*', '?', '[']) {
        paths.push(PathBuf::from(pattern));
    }

    Ok(paths)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
