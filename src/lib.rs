#![doc = "electron-docs-sync: keep a local content tree in step with Electron's releases and docs."]

//! The crate is a single linear pipeline (see [`synchronise`]) plus the
//! clients it talks to. Remote systems sit behind the traits in [`contract`]
//! so the pipeline can run against mocks in tests.

pub mod branches;
pub mod cli;
pub mod config;
pub mod contract;
pub mod docs;
pub mod download;
pub mod error;
pub mod github;
pub mod load_config;
pub mod prune;
pub mod registry;
pub mod synchronise;
pub mod writer;

pub use cli::{run, Cli, Commands};
pub use error::SyncError;
