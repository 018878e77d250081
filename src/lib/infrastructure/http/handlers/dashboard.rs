//! Operator dashboard

use askama::Template;
use axum::{extract::State, routing::get, Router};

use crate::{
    domain::{
        emails::EmailService,
        history::{HistoryRecord, HistoryService},
        templates::{self, TemplateService},
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Number of sends shown on the dashboard
const RECENT_SENDS: u32 = 20;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// A template row
#[derive(Debug)]
pub struct TemplateRow {
    name: String,
    created_at: String,
    updated_at: String,
    size: usize,
}

impl From<templates::Template> for TemplateRow {
    fn from(template: templates::Template) -> Self {
        Self {
            size: template.content.len(),
            name: template.name,
            created_at: template.created_at.format(TIMESTAMP_FORMAT).to_string(),
            updated_at: template
                .updated_at
                .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

/// A send row
#[derive(Debug)]
pub struct SendRow {
    timestamp: String,
    to: String,
    subject: String,
    template_name: String,
    status: String,
}

impl From<HistoryRecord> for SendRow {
    fn from(record: HistoryRecord) -> Self {
        Self {
            timestamp: record.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            to: record.to.join(", "),
            subject: record.subject,
            template_name: record.template_name.unwrap_or_else(|| "-".to_string()),
            status: record.status,
        }
    }
}

/// Dashboard page
#[derive(Debug, Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    title: String,
    version: String,
    templates: Vec<TemplateRow>,
    sends: Vec<SendRow>,
}

pub fn router<E, T, H>() -> Router<AppState<E, T, H>>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Router::new().route("/dashboard", get(handler))
}

/// Stored templates and the most recent sends
pub async fn handler<E, T, H>(
    State(state): State<AppState<E, T, H>>,
) -> Result<DashboardTemplate, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let templates = state.templates.list_templates().await?;
    let sends = state.history.list_recent(RECENT_SENDS).await?;

    Ok(DashboardTemplate {
        title: state.config.api_title.clone(),
        version: state.config.api_version.clone(),
        templates: templates.into_iter().map(TemplateRow::from).collect(),
        sends: sends.into_iter().map(SendRow::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use chrono::Utc;
    use mockall::predicate::eq;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::{
            history::tests::MockHistoryService,
            templates::{tests::MockTemplateService, TemplateData},
        },
        infrastructure::http::{
            router,
            state::tests::{authorized, test_state},
        },
    };

    use super::*;

    #[tokio::test]
    async fn test_dashboard_lists_templates_and_sends() -> TestResult {
        let mut templates = MockTemplateService::new();

        templates.expect_list_templates().times(1).returning(|| {
            Ok(vec![templates::Template {
                id: Uuid::now_v7(),
                name: "welcome".to_string(),
                content: "<p>Hi</p>".to_string(),
                created_at: Utc::now(),
                updated_at: None,
            }])
        });

        let mut history = MockHistoryService::new();

        history
            .expect_list_recent()
            .times(1)
            .with(eq(RECENT_SENDS))
            .returning(|_| {
                Ok(vec![HistoryRecord {
                    id: Uuid::now_v7(),
                    to: vec!["a@x.com".to_string()],
                    recipients_count: 1,
                    subject: "Quarterly update".to_string(),
                    timestamp: Utc::now(),
                    status: "sent".to_string(),
                    template_name: Some("newsletter".to_string()),
                    template_variables: TemplateData::new(),
                    html_body_preview: None,
                    html_body_full: None,
                }])
            });

        let (header, value) = authorized();

        let response = TestServer::new(router(test_state(None, Some(templates), Some(history))))?
            .get("/dashboard")
            .add_header(header, value)
            .await;

        response.assert_status_ok();

        let html = response.text();

        assert!(html.contains("Email Service API"));
        assert!(html.contains("welcome"));
        assert!(html.contains("Quarterly update"));
        assert!(html.contains("newsletter"));

        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_requires_credentials() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .get("/dashboard")
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

        Ok(())
    }
}
