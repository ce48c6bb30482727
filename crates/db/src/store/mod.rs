//! The record store abstraction shared by every backend.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use describer_core::collection::{Collection, ANSWER_VALUES};
use describer_core::types::Record;
use serde_json::Value;

/// Document store holding the knowledge base.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert records into a collection atomically.
    ///
    /// Returns whether the write was acknowledged. An empty batch is
    /// acknowledged without touching the store.
    async fn insert_many(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> Result<bool, sqlx::Error>;

    /// Distinct string values of `field` across a collection, sorted.
    async fn distinct_values(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<Vec<String>, sqlx::Error>;

    /// Names of every stored question, sorted.
    async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error>;

    /// Store a new question. Returns `false` if it already exists.
    async fn insert_question(&self, name: &str) -> Result<bool, sqlx::Error>;

    /// Field that identifies the profile in knowledge records.
    async fn target_field(&self) -> Result<String, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}

/// Attribute collection document for a question: `{_id, values}`.
pub fn question_document(name: &str) -> Record {
    let mut doc = Record::new();
    doc.insert("_id".into(), Value::String(name.to_string()));
    doc.insert(
        "values".into(),
        Value::Array(
            ANSWER_VALUES
                .iter()
                .map(|v| Value::String(v.to_string()))
                .collect(),
        ),
    );
    doc
}
