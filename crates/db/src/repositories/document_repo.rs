//! Repository for the `documents` table.

use describer_core::collection::Collection;
use describer_core::types::Record;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Query helpers over JSONB documents grouped by collection.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a batch of documents in one transaction, tagged with a shared
    /// batch id. Returns the number of rows written.
    pub async fn insert_batch(
        pool: &PgPool,
        collection: Collection,
        batch_id: Uuid,
        records: &[Record],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut written = 0;

        for record in records {
            let result = sqlx::query(
                "INSERT INTO documents (collection, batch_id, document) VALUES ($1, $2, $3)",
            )
            .bind(collection.name())
            .bind(batch_id)
            .bind(Json(record))
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Distinct non-null text values of a top-level field.
    pub async fn distinct_field_values(
        pool: &PgPool,
        collection: Collection,
        field: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT document ->> $2 AS value
             FROM documents
             WHERE collection = $1 AND document ->> $2 IS NOT NULL
             ORDER BY value",
        )
        .bind(collection.name())
        .bind(field)
        .fetch_all(pool)
        .await
    }

    /// Question names from the attributes collection, sorted.
    pub async fn list_question_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT document ->> '_id' AS name
             FROM documents
             WHERE collection = 'attributes' AND document ->> '_id' IS NOT NULL
             ORDER BY name",
        )
        .fetch_all(pool)
        .await
    }

    /// Insert a question document unless one with the same `_id` exists.
    ///
    /// Returns `true` when a row was written.
    pub async fn insert_question(
        pool: &PgPool,
        batch_id: Uuid,
        document: &Record,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, batch_id, document)
             VALUES ('attributes', $1, $2)
             ON CONFLICT ((document ->> '_id')) WHERE collection = 'attributes' DO NOTHING",
        )
        .bind(batch_id)
        .bind(Json(document))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// `target_column` of the oldest metadata document, if any.
    pub async fn find_target_column(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
        let value = sqlx::query_scalar::<_, Option<String>>(
            "SELECT document ->> 'target_column'
             FROM documents
             WHERE collection = 'metadata'
             ORDER BY id
             LIMIT 1",
        )
        .fetch_optional(pool)
        .await?;
        Ok(value.flatten())
    }
}
