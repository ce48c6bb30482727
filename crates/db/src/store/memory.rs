use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use describer_core::collection::{Collection, DEFAULT_TARGET_FIELD};
use describer_core::types::Record;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::store::{question_document, RecordStore};

/// [`RecordStore`] held entirely in memory.
///
/// Thread-safe via interior `RwLock`; share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, Vec<Record>>>,
}

impl MemoryRecordStore {
    /// An empty store using [`DEFAULT_TARGET_FIELD`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose metadata names `target_field` and whose catalog holds
    /// `questions`.
    pub fn seeded<I, S>(target_field: &str, questions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metadata = Record::new();
        metadata.insert(
            "target_column".into(),
            Value::String(target_field.to_string()),
        );

        let attributes = questions
            .into_iter()
            .map(|q| question_document(q.as_ref()))
            .collect();

        let mut collections = HashMap::new();
        collections.insert(Collection::Metadata, vec![metadata]);
        collections.insert(Collection::Attributes, attributes);

        Self {
            collections: RwLock::new(collections),
        }
    }

    /// Snapshot of every record in a collection, in insertion order.
    pub async fn records(&self, collection: Collection) -> Vec<Record> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_many(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> Result<bool, sqlx::Error> {
        if records.is_empty() {
            return Ok(true);
        }
        let count = records.len();
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .extend(records);
        tracing::debug!(collection = %collection, count, "Inserted documents in memory");
        Ok(true)
    }

    async fn distinct_values(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        let guard = self.collections.read().await;
        let values: BTreeSet<String> = guard
            .get(&collection)
            .into_iter()
            .flatten()
            .filter_map(|record| match record.get(field) {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Null) | None => None,
                Some(other) => Some(other.to_string()),
            })
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error> {
        self.distinct_values(Collection::Attributes, "_id").await
    }

    async fn insert_question(&self, name: &str) -> Result<bool, sqlx::Error> {
        let mut guard = self.collections.write().await;
        let attributes = guard.entry(Collection::Attributes).or_default();

        let exists = attributes
            .iter()
            .any(|doc| doc.get("_id").and_then(Value::as_str) == Some(name));
        if exists {
            return Ok(false);
        }

        attributes.push(question_document(name));
        Ok(true)
    }

    async fn target_field(&self) -> Result<String, sqlx::Error> {
        let guard = self.collections.read().await;
        let field = guard
            .get(&Collection::Metadata)
            .and_then(|docs| docs.first())
            .and_then(|doc| doc.get("target_column"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(field.unwrap_or_else(|| DEFAULT_TARGET_FIELD.to_string()))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
