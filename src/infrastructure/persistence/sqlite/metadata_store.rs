//! SQLite Metadata Store

use async_trait::async_trait;
use chrono::Utc;

use super::DbPool;
use crate::application::ports::{MetadataStorePort, Namespace, StorageError};

/// SQLite 元数据存储
pub struct SqliteMetadataStore {
    pool: DbPool,
}

impl SqliteMetadataStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn db_error(e: sqlx::Error) -> StorageError {
    StorageError::DatabaseError(e.to_string())
}

#[async_trait]
impl MetadataStorePort for SqliteMetadataStore {
    async fn put(&self, namespace: Namespace, id: &str, record: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"
            INSERT INTO metadata (namespace, id, record, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(namespace, id) DO UPDATE SET
                record = excluded.record,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(namespace.as_str())
        .bind(id)
        .bind(record)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get(&self, namespace: Namespace, id: &str) -> Result<String, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT record FROM metadata WHERE namespace = ? AND id = ?")
                .bind(namespace.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(|(record,)| record)
            .ok_or_else(|| StorageError::not_found(namespace, id))
    }

    async fn delete(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM metadata WHERE namespace = ? AND id = ?")
            .bind(namespace.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, namespace: Namespace, id: &str) -> Result<bool, StorageError> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT 1 FROM metadata WHERE namespace = ? AND id = ?")
                .bind(namespace.as_str())
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(row.is_some())
    }

    async fn list(&self, namespace: Namespace) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT record FROM metadata WHERE namespace = ? ORDER BY created_at ASC",
        )
        .bind(namespace.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(|(record,)| record).collect())
    }
}
