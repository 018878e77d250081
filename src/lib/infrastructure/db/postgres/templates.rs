//! Postgres implementation of the TemplateRepository trait

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{error::ErrorKind::UniqueViolation, query, query_as, Error::Database, FromRow};
use uuid::Uuid;

use crate::{
    domain::templates::{
        errors::{CreateTemplateError, DeleteTemplateError, GetTemplateError, UpdateTemplateError},
        NewTemplate, Template, TemplateRepository,
    },
    infrastructure::db::postgres::PostgresDatabase,
};

#[derive(FromRow)]
struct TemplateRecord {
    id: Uuid,
    name: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<TemplateRecord> for Template {
    fn from(record: TemplateRecord) -> Self {
        Template {
            id: record.id,
            name: record.name,
            content: record.content,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        Database(db_err) => matches!(db_err.kind(), UniqueViolation),
        _ => false,
    }
}

#[async_trait]
impl TemplateRepository for PostgresDatabase {
    #[mutants::skip]
    async fn list_templates(&self) -> Result<Vec<Template>> {
        let records = query_as::<_, TemplateRecord>(
            r#"
            SELECT id, name, content, created_at, updated_at
            FROM email_templates
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to load templates")?;

        Ok(records.into_iter().map(Template::from).collect())
    }

    #[mutants::skip]
    async fn get_template(&self, name: &str) -> Result<Template, GetTemplateError> {
        query_as::<_, TemplateRecord>(
            r#"
            SELECT id, name, content, created_at, updated_at
            FROM email_templates
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| GetTemplateError::UnknownError(anyhow!("Unknown database error: {:?}", err)))?
        .map(Template::from)
        .ok_or_else(|| GetTemplateError::TemplateNotFound(name.to_string()))
    }

    #[mutants::skip]
    async fn create_template(
        &self,
        template: &NewTemplate,
    ) -> Result<Template, CreateTemplateError> {
        let record = query_as::<_, TemplateRecord>(
            r#"
            INSERT INTO email_templates (id, name, content, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING id, name, content, created_at, updated_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(template.name())
        .bind(template.content())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                CreateTemplateError::DuplicateTemplate(template.name().to_string())
            } else {
                CreateTemplateError::UnknownError(anyhow!("Unknown database error: {:?}", err))
            }
        })?;

        Ok(record.into())
    }

    #[mutants::skip]
    async fn update_template(
        &self,
        name: &str,
        template: &NewTemplate,
    ) -> Result<Template, UpdateTemplateError> {
        query_as::<_, TemplateRecord>(
            r#"
            UPDATE email_templates
            SET name = $1,
                content = $2,
                updated_at = NOW()
            WHERE name = $3
            RETURNING id, name, content, created_at, updated_at
            "#,
        )
        .bind(template.name())
        .bind(template.content())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                UpdateTemplateError::DuplicateTemplate(template.name().to_string())
            } else {
                UpdateTemplateError::UnknownError(anyhow!("Unknown database error: {:?}", err))
            }
        })?
        .map(Template::from)
        .ok_or_else(|| UpdateTemplateError::TemplateNotFound(name.to_string()))
    }

    #[mutants::skip]
    async fn delete_template(&self, name: &str) -> Result<(), DeleteTemplateError> {
        let result = query("DELETE FROM email_templates WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                DeleteTemplateError::UnknownError(anyhow!("Unknown database error: {:?}", err))
            })?;

        if result.rows_affected() == 0 {
            return Err(DeleteTemplateError::TemplateNotFound(name.to_string()));
        }

        Ok(())
    }

    #[mutants::skip]
    async fn upsert_templates(&self, templates: &[NewTemplate]) -> Result<usize> {
        let mut transaction = self.pool.begin().await?;

        for template in templates {
            query(
                r#"
                INSERT INTO email_templates (id, name, content, created_at)
                VALUES ($1, $2, $3, NOW())
                ON CONFLICT (name) DO UPDATE
                SET content = EXCLUDED.content,
                    updated_at = NOW()
                "#,
            )
            .bind(Uuid::now_v7())
            .bind(template.name())
            .bind(template.content())
            .execute(&mut *transaction)
            .await
            .with_context(|| format!("failed to load template '{}'", template.name()))?;
        }

        transaction.commit().await?;

        Ok(templates.len())
    }
}
