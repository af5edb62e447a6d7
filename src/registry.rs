//! npm registry client, used to find the current stable release.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info};

use crate::contract::{PackageRegistry, RemoteError};

pub struct NpmRegistry {
    http: Client,
    registry_url: String,
}

#[derive(Deserialize)]
struct PackageManifest {
    version: String,
}

impl NpmRegistry {
    pub fn new(registry_url: &str, timeout: Option<Duration>) -> Result<Self, RemoteError> {
        let mut builder = Client::builder().user_agent(concat!("electron-docs-sync/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            registry_url: registry_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    async fn latest_version(&self, package: &str) -> Result<String, RemoteError> {
        let url = format!("{}/{}/latest", self.registry_url, package);
        info!(url = %url, "[NPM] Resolving latest version");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            error!(status = %status, url = %url, "[NPM] Registry returned error");
            return Err(format!("npm registry error for {url}: HTTP {status}").into());
        }

        let manifest: PackageManifest = response.json().await?;
        info!(package, version = %manifest.version, "[NPM] Latest version resolved");
        Ok(manifest.version)
    }
}

/// Release tag for an npm version: `10.1.0` → `v10.1.0`.
pub fn release_tag(version: &str) -> String {
    if version.starts_with('v') {
        version.to_string()
    } else {
        format!("v{version}")
    }
}
