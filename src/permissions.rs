//! Executable bits for launcher scripts shipped by the template.

use log::debug;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Owner, group and other execute bits.
pub const EXECUTE_BITS: u32 = 0o111;

/// ORs [`EXECUTE_BITS`] into the mode of each existing regular file.
/// Returns the files that were updated.
pub fn make_executable(root: &Path, scripts: &[String]) -> Result<Vec<PathBuf>> {
    let mut updated = Vec::new();
    for script in scripts {
        let path = root.join(script);
        if !path.is_file() {
            debug!("No script at '{}'", path.display());
            continue;
        }
        set_execute_bits(&path)?;
        updated.push(path);
    }
    Ok(updated)
}

#[cfg(unix)]
fn set_execute_bits(path: &Path) -> Result<()> {
    use crate::error::Error;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    let to_error = |source| Error::PermissionError { path: path.to_path_buf(), source };
    let mut permissions = fs::metadata(path).map_err(to_error)?.permissions();
    permissions.set_mode(permissions.mode() | EXECUTE_BITS);
    fs::set_permissions(path, permissions).map_err(to_error)?;

    debug!("Made '{}' executable", path.display());
    Ok(())
}

#[cfg(not(unix))]
fn set_execute_bits(path: &Path) -> Result<()> {
    debug!("Execute bits are not supported here, leaving '{}' as is", path.display());
    Ok(())
}
