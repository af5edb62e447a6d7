//! # contract: interfaces to the remote collaborators of a sync run
//!
//! The pipeline talks to three outside systems: a source-control host
//! (branches, releases), a documentation source (document sets per git ref)
//! and the npm registry. Raw URL downloads go through [`Fetcher`].
//! Each is a trait so the orchestration in [`crate::synchronise`] can be
//! driven by the real HTTP clients or by `mockall` mocks in tests.
//!
//! ## Mocking & Testing
//! - Every trait is annotated with `automock`; the generated `Mock*` types are
//!   exported when the `test-export-mocks` feature is on (the default), so
//!   integration tests under `tests/` can use them.
//!
//! ## Error handling
//! - All methods return [`RemoteError`], a boxed error. Callers lift it into
//!   [`crate::error::SyncError::Remote`] with the step that failed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::automock;

/// Error type for every remote collaborator.
pub type RemoteError = Box<dyn std::error::Error + Send + Sync>;

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
}

/// Release metadata as returned by "get release by tag". Does not contain all fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Looks up an asset by exact name.
    pub fn asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// The commit a branch points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
}

/// A repository branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: String,
    #[serde(default)]
    pub protected: bool,
    pub commit: BranchCommit,
}

/// One file of a documentation set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File stem, e.g. `browser-window` for `api/browser-window.md`.
    pub slug: String,
    /// Path relative to the repository `docs/` directory.
    pub filename: String,
    /// Raw file content, written back untouched.
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let filename = filename.into();
        let slug = std::path::Path::new(&filename)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            slug,
            filename,
            content: content.into(),
        }
    }
}

/// Queries against the source-control hosting API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// List every branch of the repository.
    async fn list_branches(&self) -> Result<Vec<Branch>, RemoteError>;

    /// Fetch a release by its tag (e.g. `v10.1.0`).
    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, RemoteError>;

    /// Fetch a single branch, including its head commit.
    async fn get_branch(&self, name: &str) -> Result<Branch, RemoteError>;
}

/// Source of documentation sets, keyed by git ref.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait DocsSource: Send + Sync {
    /// Retrieve every document for `reference`.
    ///
    /// When `prefix` is given, only documents whose filename starts with it are returned.
    async fn fetch_documents(
        &self,
        reference: &str,
        prefix: Option<&'static str>,
    ) -> Result<Vec<Document>, RemoteError>;
}

/// Package registry lookups.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// The version currently published under the `latest` dist-tag.
    async fn latest_version(&self, package: &str) -> Result<String, RemoteError>;
}

/// Plain HTTP download of a URL.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, RemoteError>;
}
