//! High-level pipeline: release → branches → prune → docs → asset → website.
//!
//! This module provides the top-level orchestration of a sync run. Every step
//! is awaited in order; the first failure stops the run and is returned to
//! the caller, which logs it and exits.
//!
//! # Major Types
//! - [`SynchroniseConfig`]: static settings for a run (repository, paths, URLs, token)
//! - [`SynchroniseReport`]: what the run resolved and wrote
//!
//! # Responsibilities
//! - Resolves the current stable release from the package registry and the hosting API
//! - Selects supported versions and records them in the [`SiteState`]
//! - Clears and repopulates the content tree
//! - Writes the state file once, at the end, and only when it changed
//!
//! # Navigation
//! - Main entrypoint: [`synchronise`]
//! - Read-only variant: [`resolve_versions`]

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, info};

use crate::branches::{select_supported_branches, CURRENT};
use crate::config::SiteState;
use crate::contract::{DocsSource, Fetcher, PackageRegistry, Release, SourceHost};
use crate::docs::{docs_dir, sync_documents, DocSelection, DocsReport};
use crate::download::{fetch_api_definition, fetch_website_file, API_ASSET_NAME};
use crate::error::{Result, SyncError};
use crate::prune::{prune_versions, reset_locale_dirs};
use crate::registry::release_tag;

/// Default source of the website locale strings.
pub const DEFAULT_WEBSITE_LOCALE_URL: &str =
    "https://cdn.jsdelivr.net/gh/electron/electronjs.org@master/data/locale.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    pub owner: String,
    pub name: String,
}

/// The top-level synchronise configuration.
#[derive(Debug, Clone)]
pub struct SynchroniseConfig {
    pub repository: RepositoryConfig,
    /// npm package whose `latest` version is the current stable release.
    pub package: String,
    pub master_branch: String,
    pub locale: String,
    pub content_dir: PathBuf,
    pub state_file: PathBuf,
    /// How many release branches to keep besides the current release.
    pub supported_versions: usize,
    pub api_asset_name: String,
    pub website_locale_url: String,
    pub github_api_url: String,
    pub npm_registry_url: String,
    /// Per-request timeout. Unset means requests may take as long as they need.
    pub timeout_secs: Option<u64>,
    pub github_token: Option<String>,
}

impl Default for SynchroniseConfig {
    fn default() -> Self {
        Self {
            repository: RepositoryConfig {
                owner: "electron".to_string(),
                name: "electron".to_string(),
            },
            package: "electron".to_string(),
            master_branch: "master".to_string(),
            locale: "en-US".to_string(),
            content_dir: PathBuf::from("content"),
            state_file: PathBuf::from("config.json"),
            supported_versions: 4,
            api_asset_name: API_ASSET_NAME.to_string(),
            website_locale_url: DEFAULT_WEBSITE_LOCALE_URL.to_string(),
            github_api_url: "https://api.github.com".to_string(),
            npm_registry_url: "https://registry.npmjs.org".to_string(),
            timeout_secs: None,
            github_token: None,
        }
    }
}

impl SynchroniseConfig {
    pub fn trace_loaded(&self) {
        info!(
            repository = %format!("{}/{}", self.repository.owner, self.repository.name),
            package = %self.package,
            content_dir = %self.content_dir.display(),
            state_file = %self.state_file.display(),
            supported_versions = self.supported_versions,
            authenticated = self.github_token.is_some(),
            "Loaded SynchroniseConfig"
        );
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn locale_dir(&self, version: &str) -> PathBuf {
        self.content_dir.join(version).join(&self.locale)
    }
}

/// Release and branch selection, without any filesystem effects.
#[derive(Debug, Clone)]
pub struct VersionSelection {
    pub release: Release,
    pub supported_versions: Vec<String>,
}

#[derive(Debug)]
pub struct SynchroniseReport {
    pub release_tag: String,
    pub supported_versions: Vec<String>,
    pub master_commit: String,
    pub removed_versions: Vec<String>,
    pub docs: Vec<DocsReport>,
    pub state_updated: bool,
}

/// The remote collaborators a run talks to.
pub struct Remotes<'a, H: ?Sized, D: ?Sized, R: ?Sized, F: ?Sized> {
    pub host: &'a H,
    pub docs: &'a D,
    pub registry: &'a R,
    pub fetcher: &'a F,
}

/// Resolves the current release and selects the supported branches.
pub async fn resolve_versions<H, R>(config: &SynchroniseConfig, host: &H, registry: &R) -> Result<VersionSelection>
where
    H: SourceHost + ?Sized,
    R: PackageRegistry + ?Sized,
{
    let version = registry
        .latest_version(&config.package)
        .await
        .map_err(|e| SyncError::remote(format!("latest version lookup for {}", config.package), e))?;
    let tag = release_tag(&version);
    info!(package = %config.package, version = %version, tag = %tag, "[SYNC] Current stable release");

    let release = host
        .get_release_by_tag(&tag)
        .await
        .map_err(|e| SyncError::remote(format!("release lookup for {tag}"), e))?;

    let branches = host
        .list_branches()
        .await
        .map_err(|e| SyncError::remote("branch listing", e))?;
    debug!(count = branches.len(), "[SYNC] Branches listed");

    let supported_versions = select_supported_branches(&release.tag_name, &branches, config.supported_versions);
    Ok(VersionSelection {
        release,
        supported_versions,
    })
}

pub async fn synchronise<H, D, R, F>(
    config: &SynchroniseConfig,
    state: &mut SiteState,
    remotes: Remotes<'_, H, D, R, F>,
) -> Result<SynchroniseReport>
where
    H: SourceHost + ?Sized,
    D: DocsSource + ?Sized,
    R: PackageRegistry + ?Sized,
    F: Fetcher + ?Sized,
{
    info!("[SYNC] Starting full synchronisation pipeline");

    // Step 1-2: release and supported branches
    let selection = resolve_versions(config, remotes.host, remotes.registry).await?;
    let release = selection.release;
    let supported = selection.supported_versions;

    // Checked before anything on disk is touched.
    if release.asset(&config.api_asset_name).is_none() {
        error!(tag = %release.tag_name, asset = %config.api_asset_name, "[SYNC][ERROR] Release is missing the API definition");
        return Err(SyncError::MissingAsset {
            tag: release.tag_name.clone(),
            asset: config.api_asset_name.clone(),
        });
    }

    let master = remotes
        .host
        .get_branch(&config.master_branch)
        .await
        .map_err(|e| SyncError::remote(format!("branch lookup for {}", config.master_branch), e))?;

    let mut changed = state.set_latest_stable_tag(&release.tag_name);
    changed |= state.set_supported_versions(supported.clone());
    changed |= state.set_master_branch_commit(&master.commit.sha);

    // Step 3: prune
    let removed_versions = prune_versions(&config.content_dir, &supported)?;
    reset_locale_dirs(&config.content_dir, &config.locale, &supported)?;

    // Step 4: docs
    let mut docs = Vec::new();
    let current_docs = docs_dir(&config.content_dir, CURRENT, &config.locale);
    docs.push(
        sync_documents(remotes.docs, &release.tag_name, DocSelection::ApiOnly, CURRENT, &current_docs).await?,
    );
    for version in &supported {
        let target = docs_dir(&config.content_dir, version, &config.locale);
        docs.push(sync_documents(remotes.docs, version, DocSelection::Everything, version, &target).await?);
    }
    docs.push(
        sync_documents(
            remotes.docs,
            &config.master_branch,
            DocSelection::TutorialsOnly,
            CURRENT,
            &current_docs,
        )
        .await?,
    );

    // Step 5: API definition
    let api_target = config.locale_dir(CURRENT).join(&config.api_asset_name);
    fetch_api_definition(remotes.fetcher, &release, &config.api_asset_name, &api_target).await?;

    // Step 6: website locale strings
    let locale_target = config.locale_dir(CURRENT).join("website").join("locale.yml");
    fetch_website_file(remotes.fetcher, &config.website_locale_url, &locale_target).await?;

    // Step 7: persist state once
    if changed {
        if let Err(e) = state.save(&config.state_file) {
            error!(error = %e, "[SYNC][ERROR] Failed to write state file");
            return Err(e);
        }
    } else {
        info!("[SYNC] State unchanged, not rewriting state file");
    }

    info!(
        tag = %release.tag_name,
        supported = ?supported,
        removed = ?removed_versions,
        "[SYNC] Synchronisation complete"
    );

    Ok(SynchroniseReport {
        release_tag: release.tag_name,
        supported_versions: supported,
        master_commit: master.commit.sha,
        removed_versions,
        docs,
        state_updated: changed,
    })
}
