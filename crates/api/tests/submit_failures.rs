//! Submission against a record store that refuses writes.
//!
//! A failed or unacknowledged write must surface as a 500 and leave the
//! session in the registry with its answers, so the annotator can retry.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{body_json, get, post_json, profile_storage, put_json, start_session, QUESTIONS};
use describer_core::collection::Collection;
use describer_core::types::Record;
use describer_db::{MemoryRecordStore, RecordStore};
use serde_json::json;

/// How `insert_many` misbehaves.
#[derive(Debug, Clone, Copy)]
enum WriteFailure {
    Unacknowledged,
    Error,
}

/// Delegates to a [`MemoryRecordStore`] but fails knowledge writes until
/// `recover` is called.
struct FlakyStore {
    inner: MemoryRecordStore,
    failure: WriteFailure,
    failing: AtomicBool,
}

impl FlakyStore {
    fn new(failure: WriteFailure) -> Self {
        Self {
            inner: MemoryRecordStore::seeded("Names", QUESTIONS),
            failure,
            failing: AtomicBool::new(true),
        }
    }

    fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for FlakyStore {
    async fn insert_many(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> Result<bool, sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return match self.failure {
                WriteFailure::Unacknowledged => Ok(false),
                WriteFailure::Error => Err(sqlx::Error::PoolTimedOut),
            };
        }
        self.inner.insert_many(collection, records).await
    }

    async fn distinct_values(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        self.inner.distinct_values(collection, field).await
    }

    async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error> {
        self.inner.list_questions().await
    }

    async fn insert_question(&self, name: &str) -> Result<bool, sqlx::Error> {
        self.inner.insert_question(name).await
    }

    async fn target_field(&self) -> Result<String, sqlx::Error> {
        self.inner.target_field().await
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}

/// Start a session with one ambiguous answer and submit it to a failing store.
/// Returns the store, the router and the session id.
async fn failed_submit(failure: WriteFailure) -> (Arc<FlakyStore>, axum::Router, String) {
    let store = Arc::new(FlakyStore::new(failure));
    let app = common::build_test_app(store.clone(), profile_storage(1));
    let id = start_session(&app, "random").await;

    let response = put_json(
        app.clone(),
        &format!("/api/v1/sessions/{id}/attributes/Glasses%3F"),
        json!({ "answers": ["Yes", "No"] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app.clone(), &format!("/api/v1/sessions/{id}/submit"), json!({})).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(response).await["code"], "INTERNAL_ERROR");

    (store, app, id)
}

async fn assert_session_kept(app: &axum::Router, id: &str) {
    let response = get(app.clone(), &format!("/api/v1/sessions/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let glasses = json["data"]["attributes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Glasses?")
        .cloned()
        .unwrap();
    assert_eq!(glasses["answers"], json!(["Yes", "No"]));
}

#[tokio::test]
async fn unacknowledged_write_keeps_session() {
    let (store, app, id) = failed_submit(WriteFailure::Unacknowledged).await;
    assert_session_kept(&app, &id).await;
    assert!(store.inner.records(Collection::Knowledge).await.is_empty());
}

#[tokio::test]
async fn store_error_keeps_session() {
    let (store, app, id) = failed_submit(WriteFailure::Error).await;
    assert_session_kept(&app, &id).await;
    assert!(store.inner.records(Collection::Knowledge).await.is_empty());
}

#[tokio::test]
async fn retry_after_failure_persists_once() {
    let (store, app, id) = failed_submit(WriteFailure::Error).await;
    store.recover();

    let response = post_json(app.clone(), &format!("/api/v1/sessions/{id}/submit"), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["records_inserted"], 2);
    assert_eq!(store.inner.records(Collection::Knowledge).await.len(), 2);

    let response = get(app, &format!("/api/v1/sessions/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
