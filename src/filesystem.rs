//! Existence-guarded filesystem primitives shared by the pipeline stages.

use log::debug;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Removes a file or a directory tree. Returns `false` when nothing was there.
///
/// Symlinks are removed themselves, never followed.
pub fn remove_path(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(source) => return Err(Error::RemoveError { path: path.to_path_buf(), source }),
    };

    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|source| Error::RemoveError { path: path.to_path_buf(), source })?;

    debug!("Removed '{}'", path.display());
    Ok(true)
}

/// Writes `content`, replacing the file and creating missing parent directories.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|source| Error::WriteError { path: path.to_path_buf(), source })?;
    }
    fs::write(path, content).map_err(|source| Error::WriteError { path: path.to_path_buf(), source })
}
