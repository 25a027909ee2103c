#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use todo_api::config::{Config, StorageBackend};
use todo_api::store::FileStore;
use todo_api::{app, AppState};

/// Build a file-backed application router rooted in a fresh temp
/// directory. The `TempDir` must be kept alive for the router's
/// lifetime, so it is handed back to the caller.
pub fn build_test_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let config = Arc::new(Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage_backend: StorageBackend::File,
        data_dir: dir.path().to_path_buf(),
        database_urls: Vec::new(),
    });
    let store = Arc::new(FileStore::new(config.todo_file_path()));
    let state = AppState { store, config };
    (app(state), dir)
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::POST, uri, body.to_string()).await
}

pub async fn patch_json(app: &Router, uri: &str, body: serde_json::Value) -> Response {
    send_json(app, Method::PATCH, uri, body.to_string()).await
}

/// Send a raw body with a JSON content type, for malformed-body cases.
pub async fn send_json(app: &Router, method: Method, uri: &str, body: String) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn delete(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
