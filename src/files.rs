//! Owner-only file helpers shared by the credential cache and the AWS config writer

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

pub const PRIVATE_DIR_MODE: u32 = 0o700;
pub const PRIVATE_FILE_MODE: u32 = 0o600;

/// Create `dir` (and parents) with owner-only permissions if it does not exist.
///
/// Existing directories keep their permissions.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(PRIVATE_DIR_MODE);
    }

    builder
        .create(dir)
        .with_context(|| format!("Failed to create directory: {:?}", dir))
}

/// Replace `path` with `contents` in one rename.
///
/// The data is written to a temporary file next to `path` with `mode` applied
/// before any byte is written, then renamed over the target.
pub fn write_atomic(path: &Path, contents: &[u8], mode: u32) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("Path has no parent directory: {:?}", path))?;

    let mut file = tempfile::Builder::new()
        .prefix(".tmp-")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {:?}", dir))?;

    set_mode(file.as_file(), mode)
        .with_context(|| format!("Failed to set permissions on temporary file for {:?}", path))?;

    file.write_all(contents)
        .and_then(|_| file.as_file().sync_all())
        .with_context(|| format!("Failed to write temporary file for {:?}", path))?;

    file.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace {:?}", path))?;

    Ok(())
}

/// Permission bits of an existing file, if it exists
pub fn existing_mode(path: &Path) -> Option<u32> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).ok().map(|m| m.permissions().mode() & 0o777)
    }
    #[cfg(not(unix))]
    {
        let _ = path;
        None
    }
}

#[cfg(unix)]
fn set_mode(file: &fs::File, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_file: &fs::File, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
