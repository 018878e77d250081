//! In-memory repositories for exercising the HTTP layer without a database

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::{
    history::{HistoryRecord, HistoryRepository},
    templates::{
        errors::{CreateTemplateError, DeleteTemplateError, GetTemplateError, UpdateTemplateError},
        NewTemplate, Template, TemplateRepository,
    },
};

/// Templates and send history kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    templates: Arc<Mutex<Vec<Template>>>,
    history: Arc<Mutex<Vec<HistoryRecord>>>,
}

impl InMemoryDatabase {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryDatabase {
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let mut templates = self.templates.lock().await.clone();
        templates.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(templates)
    }

    async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError> {
        self.templates
            .lock()
            .await
            .iter()
            .find(|template| template.name == name)
            .cloned()
            .ok_or_else(|| GetTemplateError::TemplateNotFound(name.to_string()))
    }

    async fn create_template(
        &self,
        template: &NewTemplate,
    ) -> Result<Template, CreateTemplateError> {
        let mut templates = self.templates.lock().await;

        if templates.iter().any(|t| t.name == template.name()) {
            return Err(CreateTemplateError::DuplicateTemplate(
                template.name().to_string(),
            ));
        }

        let created = Template {
            id: Uuid::now_v7(),
            name: template.name().to_string(),
            content: template.content().to_string(),
            created_at: Utc::now(),
            updated_at: None,
        };

        templates.push(created.clone());

        Ok(created)
    }

    async fn update_template(
        &self,
        name: &str,
        template: &NewTemplate,
    ) -> Result<Template, UpdateTemplateError> {
        let mut templates = self.templates.lock().await;

        if template.name() != name && templates.iter().any(|t| t.name == template.name()) {
            return Err(UpdateTemplateError::DuplicateTemplate(
                template.name().to_string(),
            ));
        }

        let existing = templates
            .iter_mut()
            .find(|t| t.name == name)
            .ok_or_else(|| UpdateTemplateError::TemplateNotFound(name.to_string()))?;

        existing.name = template.name().to_string();
        existing.content = template.content().to_string();
        existing.updated_at = Some(Utc::now());

        Ok(existing.clone())
    }

    async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError> {
        let mut templates = self.templates.lock().await;
        let before = templates.len();

        templates.retain(|t| t.name != name);

        if templates.len() == before {
            return Err(DeleteTemplateError::TemplateNotFound(name.to_string()));
        }

        Ok(())
    }

    async fn upsert_templates(&self, new_templates: &[NewTemplate]) -> Result<usize> {
        for template in new_templates {
            let updated = self.update_template(template.name(), template).await;

            if matches!(updated, Err(UpdateTemplateError::TemplateNotFound(_))) {
                self.create_template(template).await?;
            } else {
                updated?;
            }
        }

        Ok(new_templates.len())
    }
}

#[async_trait]
impl HistoryRepository for InMemoryDatabase {
    async fn insert_record(&self, record: &HistoryRecord) -> Result<()> {
        self.history.lock().await.push(record.clone());

        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<HistoryRecord>> {
        let history = self.history.lock().await;

        // newest first, ties broken by id as in Postgres
        let mut records: Vec<HistoryRecord> = history.iter().cloned().collect();
        records.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
        records.truncate(limit as usize);

        Ok(records)
    }

    async fn get_record(&self, id: &Uuid) -> Result<Option<HistoryRecord>> {
        Ok(self
            .history
            .lock()
            .await
            .iter()
            .find(|record| &record.id == id)
            .cloned())
    }
}

mod tests {
    use chrono::Utc;
    use testresult::TestResult;

    use crate::domain::templates::TemplateData;

    use super::*;

    fn record(id: Uuid, subject: &str, timestamp: chrono::DateTime<Utc>) -> HistoryRecord {
        HistoryRecord {
            id,
            to: vec!["a@x.com".to_string()],
            recipients_count: 1,
            subject: subject.to_string(),
            timestamp,
            status: "sent".to_string(),
            template_name: None,
            template_variables: TemplateData::new(),
            html_body_preview: None,
            html_body_full: None,
        }
    }

    #[tokio::test]
    async fn test_same_timestamp_orders_by_id() -> TestResult {
        let db = InMemoryDatabase::new();
        let at = Utc::now();

        let first = Uuid::now_v7();
        let second = Uuid::now_v7();

        db.insert_record(&record(second, "second", at)).await?;
        db.insert_record(&record(first, "first", at)).await?;

        let subjects: Vec<String> = db
            .list_recent(10)
            .await?
            .into_iter()
            .map(|record| record.subject)
            .collect();

        assert_eq!(subjects, vec!["second", "first"]);

        Ok(())
    }
}
