use std::env;
use std::fs::write;
use std::path::{Path, PathBuf};

use electron_docs_sync::load_config::{load_config, TOKEN_VARS};
use serial_test::serial;
use tempfile::NamedTempFile;

fn clear_token_env() {
    for var in TOKEN_VARS {
        env::remove_var(var);
    }
}

/// With no settings file every field keeps its default.
#[test]
#[serial]
fn test_load_config_defaults_without_file() {
    clear_token_env();

    let config = load_config(None::<&Path>).expect("Defaults should load");

    assert_eq!(config.repository.owner, "electron");
    assert_eq!(config.repository.name, "electron");
    assert_eq!(config.package, "electron");
    assert_eq!(config.master_branch, "master");
    assert_eq!(config.locale, "en-US");
    assert_eq!(config.content_dir, PathBuf::from("content"));
    assert_eq!(config.state_file, PathBuf::from("config.json"));
    assert_eq!(config.supported_versions, 4);
    assert_eq!(config.api_asset_name, "electron-api.json");
    assert_eq!(config.github_api_url, "https://api.github.com");
    assert!(config.github_token.is_none());
    assert_eq!(config.timeout_secs, None);
    assert_eq!(config.timeout(), None);
}

/// Fields present in the file override the defaults; the rest are kept.
#[test]
#[serial]
fn test_load_config_file_overrides_defaults() {
    clear_token_env();
    let config_yaml = r#"
repository:
  owner: my-fork
  name: electron
content_dir: ./site/content
supported_versions: 2
github_api_url: "http://localhost:8080/"
timeout_secs: 120
"#;
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), config_yaml).unwrap();

    let config = load_config(Some(config_file.path())).expect("Config should load");

    assert_eq!(config.repository.owner, "my-fork");
    assert_eq!(config.content_dir, PathBuf::from("./site/content"));
    assert_eq!(config.supported_versions, 2);
    assert_eq!(config.github_api_url, "http://localhost:8080");
    assert_eq!(config.timeout(), Some(std::time::Duration::from_secs(120)));
    assert_eq!(config.locale, "en-US");
    assert_eq!(config.state_file, PathBuf::from("config.json"));
}

/// An empty settings file is the same as no settings file.
#[test]
#[serial]
fn test_load_config_accepts_empty_file() {
    clear_token_env();
    let config_file = NamedTempFile::new().expect("temp file");

    let config = load_config(Some(config_file.path())).expect("Empty file should load");

    assert_eq!(config.supported_versions, 4);
}

#[test]
#[serial]
fn test_load_config_errors_for_invalid_file() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), b"not-yaml: [:::").unwrap();

    let msg = load_config(Some(config_file.path())).unwrap_err().to_string();

    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn test_load_config_rejects_unknown_keys() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "supported_version: 3\n").unwrap();

    assert!(load_config(Some(config_file.path())).is_err());
}

#[test]
#[serial]
fn test_load_config_errors_for_missing_file() {
    let msg = load_config(Some("/definitely/not/here/settings.yaml"))
        .unwrap_err()
        .to_string();

    assert!(msg.contains("Failed to read settings file"), "got: {msg}");
}

#[test]
#[serial]
fn test_load_config_rejects_zero_supported_versions() {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), "supported_versions: 0\n").unwrap();

    let msg = load_config(Some(config_file.path())).unwrap_err().to_string();

    assert!(msg.contains("supported_versions"), "got: {msg}");
}

/// The token never comes from the file, only from the environment.
#[test]
#[serial]
fn test_load_config_reads_token_from_env() {
    clear_token_env();
    env::set_var("GH_TOKEN", "from-gh");

    let config = load_config(None::<&Path>).unwrap();
    assert_eq!(config.github_token.as_deref(), Some("from-gh"));

    env::set_var("GITHUB_TOKEN", "from-github");
    let config = load_config(None::<&Path>).unwrap();
    assert_eq!(config.github_token.as_deref(), Some("from-github"));

    clear_token_env();
}
