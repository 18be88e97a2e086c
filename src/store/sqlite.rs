//! SQLite-backed key-value store.

use super::{KeyValueStore, StoreError};
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tracing::debug;

/// Store backed by the `kv_entries` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteStore { pool }
    }

    /// Keys currently stored, in lexical order.
    pub async fn keys(&self) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT key FROM kv_entries ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|row| row.get::<String, _>("key")).collect())
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<String, _>("value")))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO kv_entries (key, value, updated_at_ms)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at_ms = excluded.updated_at_ms
            "#,
        )
        .bind(key)
        .bind(&value)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(&self.pool)
        .await?;

        debug!(key, bytes = value.len(), "stored entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM kv_entries WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key, removed = result.rows_affected() > 0, "removed entry");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    async fn setup() -> (SqliteStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (SqliteStore::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let (store, _temp) = setup().await;
        assert_eq!(store.get("split_itemName").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_overwrites() {
        let (store, _temp) = setup().await;
        store.set("k", "\"one\"".to_string()).await.unwrap();
        store.set("k", "\"two\"".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("\"two\"".to_string()));
        assert_eq!(store.keys().await.unwrap(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_put_none_deletes_row() {
        let (store, _temp) = setup().await;
        store.put("k", Some("1".to_string())).await.unwrap();
        store.put("k", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(store.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let (store, _temp) = setup().await;
        store.remove("nope").await.unwrap();
    }
}
