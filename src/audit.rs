//! Post-run scan for placeholder paths that survived reconciliation.
//! Uses the manifest's sentinel name patterns, similar to how ignore files
//! are matched: each pattern is a glob tested against entry names.

use globset::{Glob, GlobSet, GlobSetBuilder};
use log::warn;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Compiles sentinel name patterns into a set.
///
/// # Errors
/// * `Error::ConfigError` if a pattern is not a valid glob
pub fn sentinel_globs(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).map_err(|e| {
            Error::ConfigError(format!("invalid sentinel pattern '{pattern}': {e}"))
        })?);
    }
    builder
        .build()
        .map_err(|e| Error::ConfigError(format!("sentinel patterns failed to compile: {e}")))
}

/// Returns every path under `root` whose name matches a sentinel pattern.
/// Matched directories are reported once, without descending into them.
pub fn find_sentinels(root: &Path, globs: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter();

    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        if globs.is_match(entry.file_name()) {
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

/// Logs each leftover sentinel and returns them.
pub fn audit(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let globs = sentinel_globs(patterns)?;
    let leftovers = find_sentinels(root, &globs)?;
    for path in &leftovers {
        warn!("Placeholder '{}' is still present", path.display());
    }
    Ok(leftovers)
}
