//! Postgres implementation of the HistoryRepository trait

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, types::Json, FromRow};
use uuid::Uuid;

use crate::{
    domain::{
        history::{HistoryRecord, HistoryRepository},
        templates::TemplateData,
    },
    infrastructure::db::postgres::PostgresDatabase,
};

#[derive(FromRow)]
struct HistoryRow {
    id: Uuid,
    recipients: Vec<String>,
    recipients_count: i32,
    subject: String,
    sent_at: DateTime<Utc>,
    status: String,
    template_name: Option<String>,
    template_variables: Json<TemplateData>,
    html_body_preview: Option<String>,
    html_body_full: Option<String>,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        HistoryRecord {
            id: row.id,
            to: row.recipients,
            recipients_count: usize::try_from(row.recipients_count).unwrap_or_default(),
            subject: row.subject,
            timestamp: row.sent_at,
            status: row.status,
            template_name: row.template_name,
            template_variables: row.template_variables.0,
            html_body_preview: row.html_body_preview,
            html_body_full: row.html_body_full,
        }
    }
}

const SELECT_HISTORY: &str = r#"
    SELECT
        id,
        recipients,
        recipients_count,
        subject,
        sent_at,
        status,
        template_name,
        template_variables,
        html_body_preview,
        html_body_full
    FROM email_history
"#;

/// Ids are UUIDv7, so they break timestamp ties in insertion order
const NEWEST_FIRST: &str = "ORDER BY sent_at DESC, id DESC LIMIT $1";

#[async_trait]
impl HistoryRepository for PostgresDatabase {
    #[mutants::skip]
    async fn insert_record(&self, record: &HistoryRecord) -> Result<()> {
        let recipients_count =
            i32::try_from(record.recipients_count).context("recipient count out of range")?;

        query(
            r#"
            INSERT INTO email_history (
                id,
                recipients,
                recipients_count,
                subject,
                sent_at,
                status,
                template_name,
                template_variables,
                html_body_preview,
                html_body_full
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(record.id)
        .bind(&record.to)
        .bind(recipients_count)
        .bind(&record.subject)
        .bind(record.timestamp)
        .bind(&record.status)
        .bind(&record.template_name)
        .bind(Json(&record.template_variables))
        .bind(&record.html_body_preview)
        .bind(&record.html_body_full)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert history record {}", record.id))?;

        Ok(())
    }

    #[mutants::skip]
    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>> {
        let rows = query_as::<_, HistoryRow>(&format!("{SELECT_HISTORY} {NEWEST_FIRST}"))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .context("failed to load send history")?;

        Ok(rows.into_iter().map(HistoryRecord::from).collect())
    }

    #[mutants::skip]
    async fn get_record(&self, id: &Uuid) -> Result<Option<HistoryRecord>> {
        let row = query_as::<_, HistoryRow>(&format!("{SELECT_HISTORY} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load history record {id}"))?;

        Ok(row.map(HistoryRecord::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_breaks_ties_by_id() {
        assert!(NEWEST_FIRST.contains("sent_at DESC, id DESC"));

        let earlier = Uuid::now_v7();
        let later = Uuid::now_v7();

        assert!(later > earlier);
    }
}
