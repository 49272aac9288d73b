//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end into a temporary output directory.

use media_spider::config::{Config, CrawlerConfig, FilterConfig, OutputConfig, UserAgentConfig};
use media_spider::crawler::{BfsFrontier, Coordinator, Frontier};
use media_spider::{LinkKind, Node};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that only follows links on the mock server
fn create_test_config(base_url: &str, extensions: &[&str], max_depth: u32, output: &Path) -> Config {
    Config {
        seeds: vec![format!("{}/", base_url)],
        extensions: extensions.iter().map(|e| e.to_string()).collect(),
        crawler: CrawlerConfig {
            max_depth,
            page_timeout_secs: 5,
            download_timeout_secs: 5,
            max_concurrent_downloads: 4,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
        },
        output: OutputConfig {
            directory: output.display().to_string(),
        },
        filter: FilterConfig {
            include: format!("^{}/.*", regex::escape(base_url)),
            exclude: None,
        },
    }
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Mounts a binary file at `route` that must be requested exactly `times` times
async fn mount_file(server: &MockServer, route: &str, bytes: &[u8], times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes.to_vec()))
        .expect(times)
        .mount(server)
        .await;
}

/// Breadth-first frontier that records every node it hands out
struct RecordingFrontier {
    inner: BfsFrontier,
    dequeued: Arc<Mutex<Vec<(u32, LinkKind, String)>>>,
}

impl Frontier for RecordingFrontier {
    fn try_dequeue(&mut self) -> Option<Node> {
        let node = self.inner.try_dequeue()?;
        self.dequeued.lock().unwrap().push((
            node.depth(),
            node.kind(),
            node.uri().path().to_string(),
        ));
        Some(node)
    }

    fn enqueue(&mut self, node: Node) {
        self.inner.enqueue(node)
    }

    fn mark_seen(&mut self, uri: &str) -> bool {
        self.inner.mark_seen(uri)
    }

    fn is_seen(&self, uri: &str) -> bool {
        self.inner.is_seen(uri)
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

fn output_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read output directory")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_off_origin_media_rejected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="page2.html">Next</a>
        <img src="https://other.com/x.jpg">
        </body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/page2.html"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body>Done</body></html>", "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg"], 2, &output);

    let coordinator = Coordinator::new(&config).expect("Failed to create coordinator");
    let stats = coordinator.run().await;

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.links_accepted, 1);
    assert_eq!(stats.downloads_started, 0);
    assert!(output_entries(&output).is_empty());
}

#[tokio::test]
async fn test_linked_and_embedded_media_downloaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <img src="/img/photo.jpg">
        <a href="/files/report.PDF?x=1">Report</a>
        <img src="/img/logo.png">
        </body></html>"#,
    )
    .await;

    mount_file(&mock_server, "/img/photo.jpg", &[0xFF, 0xD8, 0xFF], 1).await;
    mount_file(&mock_server, "/files/report.PDF", b"%PDF", 1).await;
    mount_file(&mock_server, "/img/logo.png", b"png", 0).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg", ".pdf"], 3, &output);

    let stats = Coordinator::new(&config)
        .expect("Failed to create coordinator")
        .run()
        .await;

    assert_eq!(stats.downloads_started, 2);
    assert_eq!(stats.downloads_completed, 2);
    assert_eq!(stats.bytes_downloaded, 7);
    assert_eq!(output_entries(&output), vec!["photo.jpg", "report.PDF"]);
    assert_eq!(std::fs::read(output.join("report.PDF")).unwrap(), b"%PDF");
}

#[tokio::test]
async fn test_existing_file_not_downloaded_again() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<img src="/img/photo.jpg">"#).await;
    mount_file(&mock_server, "/img/photo.jpg", b"new", 0).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    std::fs::create_dir_all(&output).unwrap();
    std::fs::write(output.join("photo.jpg"), b"old").unwrap();

    let config = create_test_config(&base_url, &["jpg"], 3, &output);
    let stats = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(stats.downloads_skipped_existing, 1);
    assert_eq!(stats.downloads_started, 0);
    assert_eq!(std::fs::read(output.join("photo.jpg")).unwrap(), b"old");
}

#[tokio::test]
async fn test_each_uri_visited_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body>
            <a href="/about">About</a>
            <a href="/about#team">Team</a>
            <a href="/a.jpg">Photo</a>
            <img src="/a.jpg">
            </body></html>"#,
            "text/html",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="/">Home</a><img src="/a.jpg"></body></html>"#,
            "text/html",
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_file(&mock_server, "/a.jpg", b"a", 1).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg"], 3, &output);

    let stats = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.links_accepted, 2);
    assert_eq!(stats.downloads_completed, 1);
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(
        &mock_server,
        "/level1",
        r#"<a href="/level2">Level 2</a><img src="/deep.jpg">"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .expect(0)
        .mount(&mock_server)
        .await;

    // Media found on the last fetched level is still downloaded
    mount_file(&mock_server, "/deep.jpg", b"deep", 1).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg"], 2, &output);

    let stats = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.downloads_completed, 1);
    assert!(output.join("deep.jpg").exists());
}

#[tokio::test]
async fn test_levels_dequeued_in_depth_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a><a href="/b">B</a><img src="/root.jpg">"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<a href="/a/1">A1</a><a href="/a/2">A2</a><img src="/a.jpg">"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<a href="/b/1">B1</a><a href="/a">A again</a><a href="/">Home</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a/1", r#"<a href="/a/1/deeper">Deeper</a>"#).await;
    mount_page(&mock_server, "/a/2", r#"<img src="/a2.jpg">"#).await;
    mount_page(&mock_server, "/b/1", r#"<a href="/b">Back</a>"#).await;

    mount_file(&mock_server, "/root.jpg", b"r", 1).await;
    mount_file(&mock_server, "/a.jpg", b"a", 1).await;
    mount_file(&mock_server, "/a2.jpg", b"a2", 1).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg"], 3, &output);

    let dequeued = Arc::new(Mutex::new(Vec::new()));
    let frontier = RecordingFrontier {
        inner: BfsFrontier::new(),
        dequeued: Arc::clone(&dequeued),
    };

    let stats = Coordinator::with_frontier(&config, frontier)
        .expect("Failed to create coordinator")
        .run()
        .await;

    let dequeued = dequeued.lock().unwrap().clone();
    let depths: Vec<u32> = dequeued.iter().map(|(depth, _, _)| *depth).collect();
    let paths: Vec<&str> = dequeued.iter().map(|(_, _, path)| path.as_str()).collect();

    assert!(
        depths.windows(2).all(|pair| pair[0] <= pair[1]),
        "depths out of order: {:?}",
        depths
    );
    assert_eq!(
        paths,
        vec!["/", "/a", "/b", "/root.jpg", "/a/1", "/a/2", "/a.jpg", "/b/1", "/a2.jpg"]
    );
    assert!(dequeued
        .iter()
        .all(|(depth, kind, _)| *kind == LinkKind::Media || *depth <= 3));
    assert_eq!(stats.pages_fetched, 6);
    assert_eq!(stats.downloads_completed, 3);
}

#[tokio::test]
async fn test_failures_do_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<html><body>
        <a href="/broken">Broken</a>
        <a href="/notes.txt">Notes</a>
        <a href="/ok">OK</a>
        <img src="/missing.jpg">
        </body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notes.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"<a href="/hidden">x</a>"#, "text/plain"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/ok", r#"<img src="/x.jpg">"#).await;
    mount_file(&mock_server, "/x.jpg", b"x", 1).await;

    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("media");
    let config = create_test_config(&base_url, &["jpg"], 3, &output);

    let stats = Coordinator::new(&config).unwrap().run().await;

    assert_eq!(stats.pages_fetched, 2);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_not_html, 1);
    assert_eq!(stats.downloads_completed, 1);
    assert_eq!(stats.downloads_failed, 1);
    assert_eq!(stats.total_failures(), 2);
    assert_eq!(output_entries(&output), vec!["x.jpg"]);
}

#[test]
fn test_unparseable_seed_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = create_test_config("http://127.0.0.1:1", &["jpg"], 2, temp_dir.path());
    config.seeds = vec!["http://[broken/".to_string()];

    assert!(Coordinator::new(&config).is_err());
}
