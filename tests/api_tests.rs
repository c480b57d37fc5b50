mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use stream_catalog::{
    api::{create_router, ApiSettings, AppState},
    services::{Credentials, SnapshotStore},
};

use common::{service, single_combination_catalog, valid_credentials, FakeCatalog, FakeFactory};

fn create_test_server(dir: &TempDir, credentials: Credentials) -> TestServer {
    let factory = FakeFactory::new(FakeCatalog::new(1, 2));
    let state = AppState::new(
        service(
            SnapshotStore::new(dir.path()),
            factory,
            single_combination_catalog(),
        ),
        ApiSettings {
            credentials,
            default_max_pages: 1,
        },
    );
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_header_present() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let response = server.get("/health").await;
    let request_id = response.header("x-request-id");
    assert!(!request_id.is_empty());
}

#[tokio::test]
async fn test_list_snapshots_empty() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let response = server.get("/snapshots").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["latest"], Value::Null);
    assert_eq!(body["snapshots"], json!([]));
}

#[tokio::test]
async fn test_get_snapshot_builds_then_reuses() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let response = server.get("/snapshot").await;
    response.assert_status_ok();
    let built: Value = response.json();
    assert_eq!(built["origin"], "rebuilt");
    assert_eq!(built["count"], 2);
    assert_eq!(built["records"][0]["type"], "Movie");
    assert_eq!(built["records"][0]["provider"], "Netflix");

    let response = server.get("/snapshot").await;
    response.assert_status_ok();
    let reused: Value = response.json();
    assert_eq!(reused["origin"], "reused");
    assert_eq!(reused["filename"], built["filename"]);

    let response = server.get("/snapshots").await;
    let listing: Value = response.json();
    assert_eq!(listing["latest"], built["filename"]);
    assert_eq!(listing["snapshots"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_with_empty_credentials_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, Credentials::new("", ""));

    let response = server.post("/snapshot/refresh").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("API key"));

    let response = server.get("/snapshots").await;
    let listing: Value = response.json();
    assert_eq!(listing["snapshots"], json!([]));
}

#[tokio::test]
async fn test_refresh_rejects_zero_max_pages() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let response = server
        .post("/snapshot/refresh")
        .json(&json!({ "max_pages": 0 }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_writes_new_snapshot() {
    let dir = TempDir::new().unwrap();
    let server = create_test_server(&dir, valid_credentials());

    let first: Value = server.get("/snapshot").await.json();

    let response = server
        .post("/snapshot/refresh")
        .json(&json!({ "max_pages": 1 }))
        .await;
    response.assert_status_ok();
    let refreshed: Value = response.json();
    assert_eq!(refreshed["origin"], "rebuilt");
    assert_ne!(refreshed["filename"], first["filename"]);

    let listing: Value = server.get("/snapshots").await.json();
    assert_eq!(listing["snapshots"].as_array().unwrap().len(), 2);
}
