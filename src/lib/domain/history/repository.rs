//! History repository module

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::history::HistoryRecord;

/// History repository
#[async_trait]
pub trait HistoryRepository: Clone + Send + Sync + 'static {
    /// Append a record
    async fn insert_record(&self, record: &HistoryRecord) -> Result<()>;

    /// The `limit` most recent records, newest first
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>>;

    /// Get a record by its identifier
    async fn get_record(&self, id: &Uuid) -> Result<Option<HistoryRecord>>;
}

#[cfg(test)]
mock! {
    pub HistoryRepository {}

    impl Clone for HistoryRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl HistoryRepository for HistoryRepository {
        async fn insert_record(&self, record: &HistoryRecord) -> Result<()>;
        async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>>;
        async fn get_record(&self, id: &Uuid) -> Result<Option<HistoryRecord>>;
    }
}
