//! SQLite-backed [`CorpusStore`]

use sqlx::SqlitePool;
use trustgate_common::db;

use crate::types::{CorpusEntry, CorpusStore, VerifyError};

/// Reference corpus = stored documents at or above a minimum verification level
#[derive(Clone)]
pub struct SqliteCorpusStore {
    pool: SqlitePool,
    min_level: i64,
}

impl SqliteCorpusStore {
    pub fn new(pool: SqlitePool, min_level: i64) -> Self {
        Self { pool, min_level }
    }
}

#[async_trait::async_trait]
impl CorpusStore for SqliteCorpusStore {
    async fn list_verified_texts(
        &self,
        exclude_id: Option<&str>,
    ) -> Result<Vec<CorpusEntry>, VerifyError> {
        let rows = db::list_corpus_texts(&self.pool, self.min_level, exclude_id)
            .await
            .map_err(|e| VerifyError::CorpusUnavailable(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(id, text)| CorpusEntry { id, text })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trustgate_common::db::{init_memory_database, record_machine_verification};

    #[tokio::test]
    async fn test_lists_machine_checked_documents() {
        let pool = init_memory_database().await.unwrap();
        record_machine_verification(&pool, "a", true, "alpha text", "ok").await.unwrap();
        record_machine_verification(&pool, "b", false, "beta text", "no").await.unwrap();

        let store = SqliteCorpusStore::new(pool, 1);
        let entries = store.list_verified_texts(None).await.unwrap();
        assert_eq!(entries, vec![CorpusEntry::new("a", "alpha text")]);
    }

    #[tokio::test]
    async fn test_closed_pool_is_corpus_unavailable() {
        let pool = init_memory_database().await.unwrap();
        pool.close().await;

        let store = SqliteCorpusStore::new(pool, 1);
        let result = store.list_verified_texts(None).await;
        assert!(matches!(result, Err(VerifyError::CorpusUnavailable(_))));
    }
}
