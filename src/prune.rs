//! Placeholder pruning.
//!
//! The templating engine always materializes every branch; disabled branches
//! land under sentinel names such as `_api_disabled`. Those, and the paths a
//! disabled flag owns outright (the Docker files), are deleted here.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::filesystem::remove_path;
use crate::plan::{Disposition, PathSpec};

/// Deletes every spec marked for removal that exists under `root`.
/// Returns the paths actually removed; missing paths are skipped.
pub fn prune(root: &Path, specs: &[PathSpec]) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for spec in specs.iter().filter(|s| s.disposition == Disposition::Remove) {
        let path = root.join(&spec.path);
        if remove_path(&path)? {
            removed.push(path);
        } else {
            debug!("Nothing to prune at '{}'", path.display());
        }
    }
    Ok(removed)
}
