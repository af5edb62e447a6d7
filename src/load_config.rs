//! Settings loading: an optional YAML file for static settings, the GitHub
//! token from the environment. Anything not set keeps its default.

use crate::error::SyncError;
use crate::synchronise::{RepositoryConfig, SynchroniseConfig};
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Environment variables consulted, in order, for the GitHub token.
pub const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct StaticConfig {
    #[serde(default)]
    repository: Option<RepositorySection>,
    package: Option<String>,
    master_branch: Option<String>,
    locale: Option<String>,
    content_dir: Option<PathBuf>,
    state_file: Option<PathBuf>,
    supported_versions: Option<usize>,
    api_asset_name: Option<String>,
    website_locale_url: Option<String>,
    github_api_url: Option<String>,
    npm_registry_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RepositorySection {
    owner: String,
    name: String,
}

/// Reads the GitHub token from the environment, if one is set.
pub fn token_from_env() -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.trim().is_empty())
}

/// Loads the optional YAML settings file (no secrets) and injects the token from the environment.
/// Every field missing from the file keeps its default.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<SynchroniseConfig> {
    let static_conf = match path {
        Some(path) => {
            let path_ref = path.as_ref();
            info!(config_path = ?path_ref, "Loading settings from file");

            let content = match fs::read_to_string(path_ref) {
                Ok(content) => content,
                Err(e) => {
                    error!(error = ?e, config_path = ?path_ref, "Failed to read settings file");
                    return Err(SyncError::Config(format!("Failed to read settings file {:?}: {}", path_ref, e)).into());
                }
            };

            match serde_yaml::from_str::<Option<StaticConfig>>(&content) {
                Ok(conf) => {
                    info!(config_path = ?path_ref, "Parsed settings YAML successfully");
                    conf.unwrap_or_default()
                }
                Err(e) => {
                    error!(error = ?e, config_path = ?path_ref, "Failed to parse settings YAML");
                    return Err(SyncError::Config(format!("Failed to parse settings YAML: {e}")).into());
                }
            }
        }
        None => {
            info!("No settings file given, using defaults");
            StaticConfig::default()
        }
    };

    let mut config = SynchroniseConfig::default();
    if let Some(repo) = static_conf.repository {
        config.repository = RepositoryConfig {
            owner: repo.owner,
            name: repo.name,
        };
    }
    if let Some(package) = static_conf.package {
        config.package = package;
    }
    if let Some(branch) = static_conf.master_branch {
        config.master_branch = branch;
    }
    if let Some(locale) = static_conf.locale {
        config.locale = locale;
    }
    if let Some(dir) = static_conf.content_dir {
        config.content_dir = dir;
    }
    if let Some(file) = static_conf.state_file {
        config.state_file = file;
    }
    if let Some(count) = static_conf.supported_versions {
        config.supported_versions = count;
    }
    if let Some(name) = static_conf.api_asset_name {
        config.api_asset_name = name;
    }
    if let Some(url) = static_conf.website_locale_url {
        config.website_locale_url = url;
    }
    if let Some(url) = static_conf.github_api_url {
        config.github_api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(url) = static_conf.npm_registry_url {
        config.npm_registry_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = static_conf.timeout_secs {
        config.timeout_secs = Some(secs);
    }

    if config.supported_versions == 0 {
        error!("supported_versions must be at least 1");
        return Err(SyncError::Config("supported_versions must be at least 1".to_string()).into());
    }

    config.github_token = token_from_env();
    if config.github_token.is_some() {
        info!("GitHub token found in env");
    } else {
        info!("No GitHub token in env, GitHub calls will be unauthenticated");
    }

    config.trace_loaded();
    Ok(config)
}
