use std::io::Write;
use std::thread;
use std::time::Duration;

use electron_docs_sync::contract::{DocsSource, SourceHost};
use electron_docs_sync::github::{extract_documents, GitHubClient};
use electron_docs_sync::synchronise::SynchroniseConfig;
use flate2::write::GzEncoder;
use flate2::Compression;
use mockito::{Matcher, Server};

fn client(server: &Server, token: Option<&str>) -> GitHubClient {
    GitHubClient::new(&server.url(), "electron", "electron", token, Some(Duration::from_secs(5))).unwrap()
}

/// Builds a tarball laid out the way GitHub serves them.
fn tarball(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, format!("electron-electron-abc123/{path}"), *content)
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

fn branches_json(names: &[String]) -> String {
    let items: Vec<serde_json::Value> = names
        .iter()
        .map(|n| serde_json::json!({"name": n, "protected": true, "commit": {"sha": format!("sha-{n}"), "url": "x"}}))
        .collect();
    serde_json::Value::Array(items).to_string()
}

#[tokio::test]
async fn test_get_release_by_tag_parses_assets() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/electron/electron/releases/tags/v10.1.0")
        .match_header("authorization", "token secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"tag_name":"v10.1.0","name":"electron v10.1.0","draft":false,"assets":[
                {"name":"electron-api.json","browser_download_url":"https://example.test/electron-api.json","size":10}
            ]}"#,
        )
        .create_async()
        .await;

    let release = client(&server, Some("secret"))
        .get_release_by_tag("v10.1.0")
        .await
        .unwrap();

    assert_eq!(release.tag_name, "v10.1.0");
    assert_eq!(
        release.asset("electron-api.json").map(|a| a.browser_download_url.as_str()),
        Some("https://example.test/electron-api.json")
    );
}

#[tokio::test]
async fn test_list_branches_follows_pages() {
    let mut server = Server::new_async().await;
    let first: Vec<String> = (0..100).map(|i| format!("feature-{i}")).collect();
    let second = vec!["9-x-y".to_string(), "10-x-y".to_string()];

    let _p1 = server
        .mock("GET", "/repos/electron/electron/branches")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("per_page".into(), "100".into()),
        ]))
        .with_status(200)
        .with_body(branches_json(&first))
        .create_async()
        .await;
    let _p2 = server
        .mock("GET", "/repos/electron/electron/branches")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(branches_json(&second))
        .create_async()
        .await;

    let branches = client(&server, None).list_branches().await.unwrap();

    assert_eq!(branches.len(), 102);
    assert_eq!(branches[101].name, "10-x-y");
    assert!(branches.iter().all(|b| b.protected));
}

#[tokio::test]
async fn test_get_branch_returns_head_commit() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/electron/electron/branches/master")
        .with_status(200)
        .with_body(r#"{"name":"master","protected":true,"commit":{"sha":"deadbeef","url":"x"}}"#)
        .create_async()
        .await;

    let branch = client(&server, None).get_branch("master").await.unwrap();

    assert_eq!(branch.commit.sha, "deadbeef");
}

#[tokio::test]
async fn test_http_error_is_reported() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/electron/electron/releases/tags/v0.0.0")
        .with_status(404)
        .with_body(r#"{"message":"Not Found"}"#)
        .create_async()
        .await;

    let err = client(&server, None).get_release_by_tag("v0.0.0").await.unwrap_err();

    assert!(err.to_string().contains("404"), "got: {err}");
}

#[tokio::test]
async fn test_fetch_documents_reads_docs_from_tarball() {
    let files: [(&str, &[u8]); 6] = [
        ("README.md", b"repo readme"),
        ("docs/README.md", b"docs index"),
        ("docs/api/app.md", b"# app"),
        ("docs/tutorial/quick-start.md", b"# Quick Start"),
        ("docs/images/tray.png", &[0x89, 0x50, 0x4e, 0x47]),
        ("lib/browser/api/app.ts", b"export {}"),
    ];
    let archive = tarball(&files);
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/electron/electron/tarball/9-x-y")
        .with_status(200)
        .with_body(archive)
        .create_async()
        .await;

    let docs = client(&server, None).fetch_documents("9-x-y", None).await.unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["README.md", "api/app.md", "images/tray.png", "tutorial/quick-start.md"]
    );
    let app = docs.iter().find(|d| d.filename == "api/app.md").unwrap();
    assert_eq!(app.slug, "app");
    assert_eq!(app.content, b"# app");
    let png = docs.iter().find(|d| d.slug == "tray").unwrap();
    assert_eq!(png.content, vec![0x89, 0x50, 0x4e, 0x47]);
}

/// Large tarballs trickle in for a long time; the default client must not cut them off.
#[tokio::test]
async fn test_default_client_waits_for_slow_tarball() {
    let files: [(&str, &[u8]); 2] = [
        ("docs/api/app.md", b"# app"),
        ("docs/tutorial/quick-start.md", b"# Quick Start"),
    ];
    let archive = tarball(&files);
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/repos/electron/electron/tarball/master")
        .with_status(200)
        .with_chunked_body(move |w| {
            for chunk in archive.chunks(16) {
                w.write_all(chunk)?;
                w.flush()?;
                thread::sleep(Duration::from_millis(100));
            }
            Ok(())
        })
        .create_async()
        .await;

    let config = SynchroniseConfig {
        github_api_url: server.url(),
        ..Default::default()
    };
    assert_eq!(config.timeout_secs, None);

    let docs = GitHubClient::from_config(&config)
        .unwrap()
        .fetch_documents("master", None)
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
}

#[test]
fn test_extract_documents_applies_prefix() {
    let files: [(&str, &[u8]); 3] = [
        ("docs/api/app.md", b"# app"),
        ("docs/api/structures/point.md", b"# Point"),
        ("docs/tutorial/quick-start.md", b"# Quick Start"),
    ];
    let archive = tarball(&files);

    let docs = extract_documents(&archive, Some("api/")).unwrap();

    let names: Vec<&str> = docs.iter().map(|d| d.filename.as_str()).collect();
    assert_eq!(names, vec!["api/app.md", "api/structures/point.md"]);
}

#[test]
fn test_extract_documents_rejects_garbage() {
    assert!(extract_documents(b"definitely not a tarball", None).is_err());
}
