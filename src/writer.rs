//! Filesystem writes into the content tree.
//!
//! Every write creates missing parent directories and replaces whatever was
//! there before.

use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::error::{Result, SyncError};

/// Writes `content` to `path`, creating parent directories first.
///
/// An existing file is replaced entirely.
pub fn write_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| {
                error!(error = ?e, path = %parent.display(), "[WRITE] Failed to create parent directory");
                SyncError::io(parent, e)
            })?;
        }
    }

    fs::write(path, content).map_err(|e| {
        error!(error = ?e, path = %path.display(), "[WRITE] Failed to write file");
        SyncError::io(path, e)
    })?;
    debug!(path = %path.display(), bytes = content.len(), "[WRITE] Wrote file");
    Ok(())
}

/// Removes `dir` (if present) and creates it again, empty.
pub fn reset_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| {
            error!(error = ?e, path = %dir.display(), "[WRITE] Failed to remove directory");
            SyncError::io(dir, e)
        })?;
    }
    fs::create_dir_all(dir).map_err(|e| SyncError::io(dir, e))?;
    debug!(path = %dir.display(), "[WRITE] Reset directory");
    Ok(())
}
