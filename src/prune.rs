//! Content pruning ahead of a re-fetch.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::branches::CURRENT;
use crate::error::{Result, SyncError};
use crate::writer::reset_dir;

/// Names of the version directories directly under `content_dir`.
pub fn version_dirs(content_dir: &Path) -> Result<BTreeSet<String>> {
    let mut dirs = BTreeSet::new();
    if !content_dir.exists() {
        return Ok(dirs);
    }
    let entries = fs::read_dir(content_dir).map_err(|e| SyncError::io(content_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| SyncError::io(content_dir, e))?;
        let file_type = entry.file_type().map_err(|e| SyncError::io(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => {
                dirs.insert(name);
            }
            Err(name) => warn!(name = ?name, "[PRUNE] Skipping non UTF-8 directory name"),
        }
    }
    Ok(dirs)
}

/// Deletes version directories that are no longer supported.
///
/// Nothing happens when the number of directories on disk already matches
/// the supported set plus `current`. `current` itself is never deleted.
/// Returns the deleted version names.
pub fn prune_versions(content_dir: &Path, supported: &[String]) -> Result<Vec<String>> {
    let on_disk = version_dirs(content_dir)?;
    let mut expected: BTreeSet<&str> = supported.iter().map(String::as_str).collect();
    expected.insert(CURRENT);

    if on_disk.len() == expected.len() {
        info!(versions = on_disk.len(), "[PRUNE] Version directories unchanged, nothing to delete");
        return Ok(Vec::new());
    }

    let mut removed = Vec::new();
    for name in on_disk.iter().filter(|n| !expected.contains(n.as_str())) {
        let dir = content_dir.join(name);
        fs::remove_dir_all(&dir).map_err(|e| SyncError::io(&dir, e))?;
        info!(version = %name, path = %dir.display(), "[PRUNE] Removed unsupported version");
        removed.push(name.clone());
    }
    Ok(removed)
}

/// Empties `content/<version>/<locale>` for `current` and every supported version.
pub fn reset_locale_dirs(content_dir: &Path, locale: &str, supported: &[String]) -> Result<()> {
    for version in std::iter::once(CURRENT).chain(supported.iter().map(String::as_str)) {
        let dir = content_dir.join(version).join(locale);
        reset_dir(&dir)?;
        info!(version, path = %dir.display(), "[PRUNE] Cleared locale directory");
    }
    Ok(())
}
