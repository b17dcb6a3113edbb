//! Integration tests for the harvest run
//!
//! These tests use wiremock to serve a listing page and its images and
//! drive complete runs end-to-end against SQLite and a temp directory.

use flower_images::config::{ClientConfig, Config, SourceConfig, StorageConfig};
use flower_images::harvest::{build_http_client, dry_run, run, run_with_config};
use flower_images::storage::{ImageStore, NewImageRecord, SqliteStorage, IMAGE_DIRECTORY};
use flower_images::RunReport;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PATTERN: &str = "/flowers/images/";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, dir: &TempDir) -> Config {
    Config {
        source: SourceConfig {
            page_url: format!("{}/", base_url),
            image_link_pattern: PATTERN.to_string(),
        },
        storage: StorageConfig {
            default_storage: dir.path().join("storage").to_string_lossy().into_owned(),
            database_path: dir.path().join("images.db").to_string_lossy().into_owned(),
        },
        client: ClientConfig::default(),
    }
}

async fn mount_page(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(format!("bytes of {}", image_path).into_bytes())
                .insert_header("content-type", "image/jpeg"),
        )
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn img_tags(base_url: &str, paths: &[&str]) -> String {
    paths
        .iter()
        .map(|p| format!(r#"<img src="{}{}" alt="">"#, base_url, p))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::test]
async fn test_three_eligible_of_five_images() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let eligible = ["/flowers/images/roza.jpg", "/flowers/images/tulipan.jpg", "/flowers/images/lilia.jpg"];
    let page = format!(
        "<html><body>{}\n{}</body></html>",
        img_tags(&base_url, &eligible),
        img_tags(&base_url, &["/static/logo.png", "/banners/sale.gif"]),
    );
    mount_page(&server, page).await;
    for p in eligible {
        mount_image(&server, p, 1).await;
    }
    mount_image(&server, "/static/logo.png", 0).await;
    mount_image(&server, "/banners/sale.gif", 0).await;

    let config = create_test_config(&base_url, &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    let client = build_http_client(&config.client).unwrap();
    let mut rng = StdRng::seed_from_u64(3);

    let report = run(&config, &mut store, &client, &mut rng).await;

    assert_eq!(report, RunReport::saved(3));
    assert_eq!(store.count_images().unwrap(), 3);

    let mut locations = HashSet::new();
    for p in eligible {
        let record = store
            .find_by_link(&format!("{}{}", base_url, p))
            .unwrap()
            .expect("record for eligible image");
        let location = record.file_location.unwrap();
        assert!(Path::new(&location).starts_with(IMAGE_DIRECTORY));

        let stored = Path::new(&config.storage.default_storage).join(&location);
        assert_eq!(std::fs::read(stored).unwrap(), format!("bytes of {}", p).into_bytes());
        locations.insert(location);
    }
    assert_eq!(locations.len(), 3, "each image gets its own file name");
}

#[tokio::test]
async fn test_already_saved_image_is_not_downloaded() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(&server, img_tags(&base_url, &["/flowers/images/roza.jpg"])).await;
    mount_image(&server, "/flowers/images/roza.jpg", 0).await;

    let config = create_test_config(&base_url, &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    store
        .commit_batch(&[NewImageRecord::new(
            format!("{}/flowers/images/roza.jpg", base_url),
            "images/earlier",
        )])
        .unwrap();
    let client = build_http_client(&config.client).unwrap();

    let report = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(0)).await;

    assert_eq!(report, RunReport::saved(0));
    assert_eq!(store.count_images().unwrap(), 1);
    assert!(!Path::new(&config.storage.default_storage).join(IMAGE_DIRECTORY).exists());
}

#[tokio::test]
async fn test_page_fetch_failure_reports_one_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    let client = build_http_client(&config.client).unwrap();

    let report = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(0)).await;

    assert_eq!(report.to_string(), "Saved images number: 0, errors: 1");
    assert_eq!(store.count_images().unwrap(), 0);
}

/// Log writer collecting formatted output in memory
#[derive(Clone)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_page_fetch_failure_logs_one_error_line() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = create_test_config(&server.uri(), &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    let client = build_http_client(&config.client).unwrap();

    let logs = SharedBuf(Arc::new(Mutex::new(Vec::new())));
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .with_max_level(tracing::Level::INFO)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);

    let report = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(0)).await;
    drop(guard);

    assert_eq!(report, RunReport::failed());
    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    let error_lines: Vec<&str> = output.lines().filter(|line| line.contains("ERROR")).collect();
    assert_eq!(error_lines.len(), 1, "log output:\n{}", output);
    assert!(error_lines[0].contains("HTTP status 500"));
}

#[tokio::test]
async fn test_cap_of_three_per_run_and_second_run_continues() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let paths: Vec<String> = (1..=5).map(|i| format!("/flowers/images/{}.jpg", i)).collect();
    let path_refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    mount_page(&server, img_tags(&base_url, &path_refs)).await;
    // Every image is downloaded exactly once across both runs
    for p in &path_refs {
        mount_image(&server, p, 1).await;
    }

    let config = create_test_config(&base_url, &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    let client = build_http_client(&config.client).unwrap();

    let first = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(11)).await;
    assert_eq!(first, RunReport::saved(3));
    assert_eq!(store.count_images().unwrap(), 3);

    let second = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(12)).await;
    assert_eq!(second, RunReport::saved(2));
    assert_eq!(store.count_images().unwrap(), 5);
}

#[tokio::test]
async fn test_second_run_is_idempotent() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let eligible = ["/flowers/images/a.jpg", "/flowers/images/b.jpg"];
    mount_page(&server, img_tags(&base_url, &eligible)).await;
    for p in eligible {
        mount_image(&server, p, 1).await;
    }

    let config = create_test_config(&base_url, &dir);

    let first = run_with_config(&config).await;
    assert_eq!(first, RunReport::saved(2));

    let second = run_with_config(&config).await;
    assert_eq!(second, RunReport::saved(0));

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path)).unwrap();
    assert_eq!(storage.count_images().unwrap(), 2);
}

#[tokio::test]
async fn test_image_failure_aborts_run_without_commit() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        img_tags(&base_url, &["/flowers/images/ok.jpg", "/flowers/images/broken.jpg"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/flowers/images/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flowers/images/broken.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = create_test_config(&base_url, &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    let client = build_http_client(&config.client).unwrap();

    let report = run(&config, &mut store, &client, &mut StdRng::seed_from_u64(5)).await;

    assert_eq!(report, RunReport::failed());
    assert_eq!(store.count_images().unwrap(), 0);
}

#[tokio::test]
async fn test_unopenable_database_is_reported_as_error() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = create_test_config(&server.uri(), &dir);
    // A directory cannot be opened as a database file
    config.storage.database_path = dir.path().to_string_lossy().into_owned();

    let report = run_with_config(&config).await;

    assert_eq!(report, RunReport::failed());
}

#[tokio::test]
async fn test_dry_run_downloads_nothing() {
    let server = MockServer::start().await;
    let base_url = server.uri();
    let dir = tempfile::tempdir().unwrap();

    mount_page(
        &server,
        img_tags(
            &base_url,
            &["/flowers/images/a.jpg", "/flowers/images/b.jpg", "/other/c.jpg"],
        ),
    )
    .await;
    mount_image(&server, "/flowers/images/a.jpg", 0).await;
    mount_image(&server, "/flowers/images/b.jpg", 0).await;

    let config = create_test_config(&base_url, &dir);
    let mut store = SqliteStorage::new_in_memory().unwrap();
    store
        .commit_batch(&[NewImageRecord::new(
            format!("{}/flowers/images/a.jpg", base_url),
            "images/earlier",
        )])
        .unwrap();
    let client = build_http_client(&config.client).unwrap();

    let report = dry_run(&config, &store, &client).await.unwrap();

    assert_eq!(report.image_count, 3);
    assert_eq!(report.candidates.len(), 2);
    assert!(report.candidates[0].already_saved);
    assert!(!report.candidates[1].already_saved);
    assert_eq!(report.would_save(), 1);
    assert_eq!(store.count_images().unwrap(), 1);
}
