use async_trait::async_trait;
use describer_core::collection::{Collection, DEFAULT_TARGET_FIELD};
use describer_core::types::Record;
use uuid::Uuid;

use crate::repositories::DocumentRepo;
use crate::store::{question_document, RecordStore};
use crate::DbPool;

/// [`RecordStore`] backed by PostgreSQL JSONB documents.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: DbPool,
}

impl PgRecordStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_many(
        &self,
        collection: Collection,
        records: Vec<Record>,
    ) -> Result<bool, sqlx::Error> {
        if records.is_empty() {
            return Ok(true);
        }

        let batch_id = Uuid::new_v4();
        let written = DocumentRepo::insert_batch(&self.pool, collection, batch_id, &records).await?;

        tracing::info!(
            collection = %collection,
            batch_id = %batch_id,
            written,
            "Inserted documents"
        );

        Ok(written == records.len() as u64)
    }

    async fn distinct_values(
        &self,
        collection: Collection,
        field: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        DocumentRepo::distinct_field_values(&self.pool, collection, field).await
    }

    async fn list_questions(&self) -> Result<Vec<String>, sqlx::Error> {
        DocumentRepo::list_question_names(&self.pool).await
    }

    async fn insert_question(&self, name: &str) -> Result<bool, sqlx::Error> {
        let inserted =
            DocumentRepo::insert_question(&self.pool, Uuid::new_v4(), &question_document(name))
                .await?;
        if !inserted {
            tracing::debug!(question = %name, "Question already stored");
        }
        Ok(inserted)
    }

    async fn target_field(&self) -> Result<String, sqlx::Error> {
        Ok(DocumentRepo::find_target_column(&self.pool)
            .await?
            .unwrap_or_else(|| DEFAULT_TARGET_FIELD.to_string()))
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
