//! Command-line interface: argument parsing and the async entrypoint shared by
//! `main` and the integration tests.
//!
//! All pipeline logic lives in [`crate::synchronise`]; this module only builds
//! the real clients from the loaded settings and prints the outcome.

use crate::config::SiteState;
use crate::download::HttpFetcher;
use crate::error::SyncError;
use crate::github::GitHubClient;
use crate::load_config::load_config;
use crate::registry::NpmRegistry;
use crate::synchronise::{resolve_versions, synchronise, Remotes};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI for electron-docs-sync: pull release docs into the local content tree.
#[derive(Parser)]
#[clap(
    name = "electron-docs-sync",
    version,
    about = "Fetch Electron release metadata, docs and website locale content into a versioned content tree"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the whole pipeline and rewrite the content tree
    Sync {
        /// Path to an optional YAML settings file
        #[clap(long)]
        settings: Option<PathBuf>,
        /// Override the content directory
        #[clap(long)]
        content_dir: Option<PathBuf>,
        /// Override the JSON state file
        #[clap(long)]
        state_file: Option<PathBuf>,
    },
    /// Print the current release and the supported versions without writing anything
    Versions {
        /// Path to an optional YAML settings file
        #[clap(long)]
        settings: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Sync {
            settings,
            content_dir,
            state_file,
        } => {
            let mut config = load_config(settings)?;
            if let Some(dir) = content_dir {
                config.content_dir = dir;
            }
            if let Some(file) = state_file {
                config.state_file = file;
            }
            tracing::info!(command = "sync", "Starting synchronisation process");

            let timeout = config.timeout();
            let github = GitHubClient::from_config(&config).map_err(|e| SyncError::remote("GitHub client setup", e))?;
            let npm = NpmRegistry::new(&config.npm_registry_url, timeout)
                .map_err(|e| SyncError::remote("npm client setup", e))?;
            let fetcher = HttpFetcher::new(timeout).map_err(|e| SyncError::remote("HTTP client setup", e))?;

            let mut state = SiteState::load(&config.state_file)?;
            let remotes = Remotes {
                host: &github,
                docs: &github,
                registry: &npm,
                fetcher: &fetcher,
            };
            match synchronise(&config, &mut state, remotes).await {
                Ok(report) => {
                    tracing::info!(command = "sync", ?report, "Synchronisation complete");
                    println!("Synchronise complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "sync", error = %e, "Synchronisation failed");
                    Err(e.into())
                }
            }
        }
        Commands::Versions { settings } => {
            let config = load_config(settings)?;
            let timeout = config.timeout();
            let github = GitHubClient::from_config(&config).map_err(|e| SyncError::remote("GitHub client setup", e))?;
            let npm = NpmRegistry::new(&config.npm_registry_url, timeout)
                .map_err(|e| SyncError::remote("npm client setup", e))?;

            let selection = resolve_versions(&config, &github, &npm).await?;
            println!("current: {}", selection.release.tag_name);
            for version in &selection.supported_versions {
                println!("supported: {version}");
            }
            Ok(())
        }
    }
}
