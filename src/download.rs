//! Single-file downloads: the API definition asset and the website locale file.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};

use crate::contract::{Fetcher, Release, RemoteError};
use crate::error::{Result, SyncError};
use crate::writer::write_file;

/// Default name of the API definition asset attached to every release.
pub const API_ASSET_NAME: &str = "electron-api.json";

/// Plain HTTP GET of a URL, failing on non-success status codes.
pub struct HttpFetcher {
    http: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> std::result::Result<Self, RemoteError> {
        let mut builder = Client::builder().user_agent(concat!("electron-docs-sync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, RemoteError> {
        info!(url = %url, "[FETCH] Downloading");
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "[FETCH] Download returned error");
            return Err(format!("download of {url} failed: HTTP {status}").into());
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Downloads the release's API definition and writes it pretty-printed to `target`.
///
/// Fails with [`SyncError::MissingAsset`] when the release does not carry it.
pub async fn fetch_api_definition<F>(
    fetcher: &F,
    release: &Release,
    asset_name: &str,
    target: &Path,
) -> Result<()>
where
    F: Fetcher + ?Sized,
{
    let asset = release.asset(asset_name).ok_or_else(|| {
        error!(tag = %release.tag_name, asset = asset_name, "[ASSET] Release has no such asset");
        SyncError::MissingAsset {
            tag: release.tag_name.clone(),
            asset: asset_name.to_string(),
        }
    })?;

    let raw = fetcher
        .fetch(&asset.browser_download_url)
        .await
        .map_err(|e| SyncError::remote(format!("download of {asset_name}"), e))?;
    let value: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|e| SyncError::json(asset_name, e))?;
    let pretty = serde_json::to_string_pretty(&value).map_err(|e| SyncError::json(asset_name, e))?;

    write_file(target, pretty.as_bytes())?;
    info!(path = %target.display(), "[ASSET] API definition written");
    Ok(())
}

/// Downloads `url` and writes the body verbatim to `target`.
pub async fn fetch_website_file<F>(fetcher: &F, url: &str, target: &Path) -> Result<()>
where
    F: Fetcher + ?Sized,
{
    let body = fetcher
        .fetch(url)
        .await
        .map_err(|e| SyncError::remote(format!("download of {url}"), e))?;
    write_file(target, &body)?;
    info!(path = %target.display(), bytes = body.len(), "[WEBSITE] Website file written");
    Ok(())
}
