use arjun_server::{
    EditorConfig, FetchError, LinkFetcher, Router, RuntimeMode, bind_available, serve,
};
use serde_json::{Value as JsonValue, json};
use std::fs;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

struct OfflineFetcher;

impl LinkFetcher for OfflineFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::UnsupportedUrl(url.to_string()))
    }
}

fn start(dir: &TempDir) -> String {
    let (listener, port) = bind_available("127.0.0.1", 0).unwrap();
    let config = EditorConfig {
        editor_port: port,
        ..EditorConfig::for_content_dir(dir.path())
    };
    let router = Arc::new(Router::new(config, RuntimeMode::Development, OfflineFetcher));
    thread::spawn(move || serve(router, listener, 2));
    format!("http://127.0.0.1:{port}")
}

#[test]
fn edits_a_file_over_http() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("guide.md"),
        "---\ntitle: Guide\n---\n\n# Guide\n\nStep one.",
    )
    .unwrap();
    let base = start(&dir);
    let client = reqwest::blocking::Client::new();

    let page = client.get(format!("{base}/guide/_edit")).send().unwrap();
    assert_eq!(page.status().as_u16(), 200);
    assert_eq!(
        page.headers()["access-control-allow-origin"].to_str().unwrap(),
        "*"
    );
    assert!(page.text().unwrap().contains("Step one."));

    let loaded: JsonValue = client
        .get(format!("{base}/api/_edit/load/guide"))
        .send()
        .unwrap()
        .json()
        .unwrap();
    let mut document = loaded["data"].clone();
    document["blocks"][1]["data"]["text"] = json!("Step two.");

    let saved: JsonValue = client
        .post(format!("{base}/api/_edit/save"))
        .header("Content-Type", "application/json")
        .body(json!({ "slug": "guide", "content": document }).to_string())
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(saved["success"], json!(true));
    assert_eq!(
        fs::read_to_string(dir.path().join("guide.md")).unwrap(),
        "---\ntitle: Guide\n---\n\n# Guide\n\nStep two."
    );
}

#[test]
fn unknown_paths_and_failed_previews() {
    let dir = TempDir::new().unwrap();
    let base = start(&dir);
    let client = reqwest::blocking::Client::new();

    let missing = client.get(format!("{base}/missing")).send().unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let preview: JsonValue = client
        .post(format!("{base}/api/_edit/fetchUrl"))
        .body(r#"{"url":"https://example.com"}"#)
        .send()
        .unwrap()
        .json()
        .unwrap();
    assert_eq!(preview, json!({ "success": 0, "error": "Failed to fetch URL data" }));
}
