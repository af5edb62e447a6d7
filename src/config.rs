//! The JSON state file shared with the website build.
//!
//! The file is read once at the start of a run, updated in memory and written
//! back once at the end. Keys this tool does not own are kept untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::writer::write_file;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteState {
    #[serde(default)]
    pub supported_versions: Vec<String>,
    #[serde(default)]
    pub electron_latest_stable_tag: String,
    #[serde(default)]
    pub electron_master_branch_commit: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SiteState {
    /// Reads the state file. A missing file yields an empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "[STATE] No state file yet, starting empty");
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
        let state: SiteState =
            serde_json::from_str(&raw).map_err(|e| SyncError::json(path.display().to_string(), e))?;
        state.trace_loaded();
        Ok(state)
    }

    /// Writes the whole state, pretty-printed with a trailing newline.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut body = serde_json::to_string_pretty(self)
            .map_err(|e| SyncError::json(path.display().to_string(), e))?;
        body.push('\n');
        write_file(path, body.as_bytes())?;
        info!(path = %path.display(), "[STATE] State file written");
        Ok(())
    }

    pub fn trace_loaded(&self) {
        info!(
            supported_versions = ?self.supported_versions,
            latest_stable_tag = %self.electron_latest_stable_tag,
            master_commit = %self.electron_master_branch_commit,
            "Loaded SiteState"
        );
        debug!(other_keys = self.other.len(), "SiteState loaded (extra keys)");
    }

    /// Replaces the supported versions; returns whether anything changed.
    pub fn set_supported_versions(&mut self, versions: Vec<String>) -> bool {
        if self.supported_versions == versions {
            return false;
        }
        self.supported_versions = versions;
        true
    }

    /// Replaces the latest stable tag; returns whether anything changed.
    pub fn set_latest_stable_tag(&mut self, tag: &str) -> bool {
        if self.electron_latest_stable_tag == tag {
            return false;
        }
        self.electron_latest_stable_tag = tag.to_string();
        true
    }

    /// Replaces the master head commit; returns whether anything changed.
    pub fn set_master_branch_commit(&mut self, sha: &str) -> bool {
        if self.electron_master_branch_commit == sha {
            return false;
        }
        self.electron_master_branch_commit = sha.to_string();
        true
    }
}
