//! Error type for a sync run.

use std::path::PathBuf;

use crate::contract::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The release does not carry an asset the run depends on.
    #[error("release {tag} has no asset named {asset}")]
    MissingAsset { tag: String, asset: String },

    /// Network, HTTP status, auth, rate-limit or decode failure of a remote call.
    #[error("{step} failed: {source}")]
    Remote {
        step: String,
        #[source]
        source: RemoteError,
    },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn remote(step: impl Into<String>, source: RemoteError) -> Self {
        Self::Remote {
            step: step.into(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            what: what.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
