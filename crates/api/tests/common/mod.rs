#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use describer_api::config::{RecordStoreKind, ServerConfig};
use describer_api::router::build_app_router;
use describer_api::sessions::SessionRegistry;
use describer_api::state::AppState;
use describer_db::{MemoryRecordStore, RecordStore};
use describer_storage::memory::MemoryBackend;

/// Questions every test catalog starts with.
pub const QUESTIONS: [&str; 3] = ["Blond hair?", "Glasses?", "Smiling?"];

/// Build a test `ServerConfig` with safe defaults and the in-memory store.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        profiles_total: 10,
        record_store: RecordStoreKind::Memory,
        database_url: None,
    }
}

/// A store seeded with the `Names` target field and [`QUESTIONS`].
pub fn seeded_store() -> Arc<MemoryRecordStore> {
    Arc::new(MemoryRecordStore::seeded("Names", QUESTIONS))
}

/// Storage holding profiles `0.jpg` through `count - 1`.
pub fn profile_storage(count: u32) -> MemoryBackend {
    (0..count).fold(MemoryBackend::new(), |backend, n| {
        backend.with_image(format!("{n}.jpg"), vec![0xFF, 0xD8, n as u8])
    })
}

/// Build the full application router over the given store and storage.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack. The returned router is cheap to clone and
/// every clone shares the session registry.
pub fn build_test_app(store: Arc<dyn RecordStore>, storage: MemoryBackend) -> Router {
    let config = test_config();
    let state = AppState {
        store,
        storage: Arc::new(storage),
        sessions: Arc::new(SessionRegistry::new()),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// POST without a body or content type.
pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Start a session and return its id.
pub async fn start_session(app: &Router, mode: &str) -> String {
    let response = post_json(
        app.clone(),
        "/api/v1/sessions",
        serde_json::json!({ "mode": mode }),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["session_id"].as_str().unwrap().to_string()
}
