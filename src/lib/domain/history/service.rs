//! History service module

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info};
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::history::{
    errors::GetHistoryError, HistoryEntry, HistoryRecord, HistoryRepository,
};

/// Number of records returned when no limit is given
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Upper bound for a requested limit
pub const MAX_HISTORY_LIMIT: u32 = 500;

/// Records send attempts and reads them back
#[async_trait]
pub trait HistoryService: Clone + Send + Sync + 'static {
    /// Records a send attempt.
    ///
    /// Never fails: a failed write is logged and the identifier is still returned,
    /// so recording can not change the outcome of the send it belongs to.
    ///
    /// # Returns
    /// The entry's identifier, or a freshly generated one if it had none.
    async fn record(&self, entry: HistoryEntry) -> Uuid;

    /// The `limit` most recent records, newest first.
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>>;

    /// Get a record by identifier.
    async fn get_record(&self, id: &str) -> Result<HistoryRecord, GetHistoryError>;
}

#[cfg(test)]
mock! {
    pub HistoryService {}

    impl Clone for HistoryService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl HistoryService for HistoryService {
        async fn record(&self, entry: HistoryEntry) -> Uuid;
        async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>>;
        async fn get_record(&self, id: &str) -> Result<HistoryRecord, GetHistoryError>;
    }
}

/// History service implementation
#[derive(Debug, Clone)]
pub struct HistoryServiceImpl<R>
where
    R: HistoryRepository,
{
    repo: Arc<R>,
}

impl<R> HistoryServiceImpl<R>
where
    R: HistoryRepository,
{
    /// Create a new history service
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> HistoryService for HistoryServiceImpl<R>
where
    R: HistoryRepository,
{
    async fn record(&self, entry: HistoryEntry) -> Uuid {
        let id = entry.id.unwrap_or_else(Uuid::now_v7);
        let record = HistoryRecord::from_entry(entry, id, Utc::now());

        match self.repo.insert_record(&record).await {
            Ok(()) => info!(%id, "email logged to history"),
            Err(err) => error!(%id, "failed to add email to history: {err:?}"),
        }

        id
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>> {
        self.repo
            .list_recent(limit.clamp(1, MAX_HISTORY_LIMIT))
            .await
    }

    async fn get_record(&self, id: &str) -> Result<HistoryRecord, GetHistoryError> {
        let Ok(uuid) = Uuid::parse_str(id) else {
            return Err(GetHistoryError::RecordNotFound(id.to_string()));
        };

        self.repo
            .get_record(&uuid)
            .await?
            .ok_or_else(|| GetHistoryError::RecordNotFound(id.to_string()))
    }
}
