//! GitHub REST client: branches, releases and documentation tarballs.

use std::io::Read;
use std::path::{Component, Path};
use std::time::Duration;

use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::{header, Client};
use tar::Archive;
use tracing::{debug, error, info};

use crate::contract::{Branch, DocsSource, Document, Release, RemoteError, SourceHost};
use crate::synchronise::SynchroniseConfig;

const PER_PAGE: usize = 100;

/// Directory inside the repository holding the documentation.
pub const DOCS_DIR: &str = "docs";

pub struct GitHubClient {
    http: Client,
    api_url: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(
        api_url: &str,
        owner: &str,
        repo: &str,
        token: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, RemoteError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("electron-docs-sync/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        if let Some(token) = token {
            let mut value = header::HeaderValue::from_str(&format!("token {token}"))
                .map_err(|e| format!("Invalid GitHub token: {e}"))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn from_config(config: &SynchroniseConfig) -> Result<Self, RemoteError> {
        Self::new(
            &config.github_api_url,
            &config.repository.owner,
            &config.repository.name,
            config.github_token.as_deref(),
            config.timeout(),
        )
    }

    fn repo_url(&self, tail: &str) -> String {
        format!("{}/repos/{}/{}/{}", self.api_url, self.owner, self.repo, tail)
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, RemoteError> {
        debug!(url = %url, "[GITHUB] GET");
        let response = self.http.get(url).send().await.map_err(|e| {
            error!(error = ?e, url = %url, "[GITHUB] Request failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, url = %url, body = %body, "[GITHUB] API returned error");
            return Err(format!("GitHub API error for {url}: HTTP {status}").into());
        }
        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RemoteError> {
        let response = self.get(url).await?;
        Ok(response.json::<T>().await?)
    }

    /// Downloads the gzip tarball of `reference`.
    pub async fn download_tarball(&self, reference: &str) -> Result<Vec<u8>, RemoteError> {
        let url = self.repo_url(&format!("tarball/{reference}"));
        info!(url = %url, reference, "[GITHUB] Downloading tarball");
        let bytes = self.get(&url).await?.bytes().await?;
        info!(reference, bytes = bytes.len(), "[GITHUB] Tarball downloaded");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn list_branches(&self) -> Result<Vec<Branch>, RemoteError> {
        let mut branches = Vec::new();
        let mut page = 1;
        loop {
            let url = self.repo_url(&format!("branches?protected=true&per_page={PER_PAGE}&page={page}"));
            let batch: Vec<Branch> = self.get_json(&url).await?;
            let done = batch.len() < PER_PAGE;
            branches.extend(batch);
            if done {
                break;
            }
            page += 1;
        }
        info!(count = branches.len(), "[GITHUB] Listed branches");
        Ok(branches)
    }

    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, RemoteError> {
        let url = self.repo_url(&format!("releases/tags/{tag}"));
        let release: Release = self.get_json(&url).await?;
        info!(tag = %release.tag_name, assets = release.assets.len(), "[GITHUB] Fetched release");
        Ok(release)
    }

    async fn get_branch(&self, name: &str) -> Result<Branch, RemoteError> {
        let url = self.repo_url(&format!("branches/{name}"));
        let branch: Branch = self.get_json(&url).await?;
        info!(branch = %branch.name, sha = %branch.commit.sha, "[GITHUB] Fetched branch");
        Ok(branch)
    }
}

#[async_trait]
impl DocsSource for GitHubClient {
    async fn fetch_documents(
        &self,
        reference: &str,
        prefix: Option<&'static str>,
    ) -> Result<Vec<Document>, RemoteError> {
        let tarball = self.download_tarball(reference).await?;
        let documents = extract_documents(&tarball, prefix)?;
        info!(reference, prefix = prefix.unwrap_or(""), count = documents.len(), "[GITHUB] Extracted documents");
        Ok(documents)
    }
}

/// Reads every regular file below `<root>/docs/` out of a GitHub gzip tarball.
///
/// GitHub wraps the tree in a single `<owner>-<repo>-<sha>/` directory, which
/// is skipped. Filenames are relative to `docs/` and always use `/`.
pub fn extract_documents(tarball: &[u8], prefix: Option<&str>) -> Result<Vec<Document>, RemoteError> {
    let mut archive = Archive::new(GzDecoder::new(tarball));
    let mut documents = Vec::new();

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path()?.into_owned();
        let Some(filename) = docs_relative_name(&path) else {
            continue;
        };
        if let Some(prefix) = prefix {
            if !filename.starts_with(prefix) {
                continue;
            }
        }

        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        documents.push(Document::new(filename, content));
    }

    documents.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(documents)
}

fn docs_relative_name(path: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.len() < 3 || parts[1] != DOCS_DIR {
        return None;
    }
    Some(parts[2..].join("/"))
}
