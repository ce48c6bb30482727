//! Record store for labeled profiles.
//!
//! The [`RecordStore`] trait is what the rest of the system talks to.
//! [`PgRecordStore`] keeps documents as JSONB rows in PostgreSQL;
//! [`MemoryRecordStore`] mirrors its semantics for tests and demos.

pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use store::memory::MemoryRecordStore;
pub use store::postgres::PgRecordStore;
pub use store::{question_document, RecordStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
