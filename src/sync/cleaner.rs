//! Destination clearing.

use crate::error::{SyncError, SyncResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Create `dest_dir` if needed and check it is a real directory.
///
/// A symlinked destination root is rejected whether or not it gets cleared.
pub fn ensure_destination_root(dest_dir: &Path) -> SyncResult<()> {
    fs::create_dir_all(dest_dir).map_err(|e| SyncError::io(dest_dir, e))?;

    let meta = fs::symlink_metadata(dest_dir).map_err(|e| SyncError::io(dest_dir, e))?;
    if !meta.is_dir() {
        return Err(SyncError::NotADirectory(dest_dir.to_path_buf()));
    }
    Ok(())
}

/// Make sure `dest_dir` exists and is empty.
///
/// The directory itself is kept. Returns how many top-level entries were
/// removed. Symlinks are unlinked, never followed.
pub fn clean_destination(dest_dir: &Path) -> SyncResult<usize> {
    ensure_destination_root(dest_dir)?;

    let mut removed = 0;
    for entry in fs::read_dir(dest_dir).map_err(|e| SyncError::io(dest_dir, e))? {
        let entry = entry.map_err(|e| SyncError::io(dest_dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| SyncError::io(&path, e))?;

        if file_type.is_dir() {
            fs::remove_dir_all(&path).map_err(|e| SyncError::io(&path, e))?;
        } else {
            fs::remove_file(&path).map_err(|e| SyncError::io(&path, e))?;
        }

        debug!("Removed {}", path.display());
        removed += 1;
    }

    Ok(removed)
}
