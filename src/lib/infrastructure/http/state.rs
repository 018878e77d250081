//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use clap::Parser;

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::auth::DocsPassword,
};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Service name shown in the API description and status endpoints
    pub api_title: String,

    /// API description
    pub api_description: String,

    /// API version
    pub api_version: String,

    /// Secret guarding the documentation, dashboard and management routes
    pub docs_password: DocsPassword,
}

/// API settings as read from the environment
#[derive(Clone, Debug, Parser)]
pub struct ApiConfig {
    /// Service name
    #[clap(long, env = "API_TITLE", default_value = "Email Service API")]
    pub api_title: String,

    /// API description
    #[clap(long, env = "API_DESCRIPTION", default_value = "A microservice for sending emails")]
    pub api_description: String,

    /// API version
    #[clap(long, env = "API_VERSION", default_value = "1.0.0")]
    pub api_version: String,

    /// Password for the documentation, dashboard and management routes
    #[clap(long, env = "DOCS_PASSWORD", hide_env_values = true)]
    pub docs_password: String,
}

impl From<ApiConfig> for AppConfig {
    fn from(config: ApiConfig) -> Self {
        Self {
            api_title: config.api_title,
            api_description: config.api_description,
            api_version: config.api_version,
            docs_password: DocsPassword::new(&config.docs_password),
        }
    }
}

/// Global application state
#[derive(Clone)]
pub struct AppState<E, T, H>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// Email service
    pub emails: Arc<E>,

    /// Template service
    pub templates: Arc<T>,

    /// History service
    pub history: Arc<H>,
}

impl<E, T, H> AppState<E, T, H>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    /// Create a new application state
    pub fn new(config: AppConfig, emails: E, templates: T, history: H) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            emails: Arc::new(emails),
            templates: Arc::new(templates),
            history: Arc::new(history),
        }
    }
}

impl<E, T, H> fmt::Debug for AppState<E, T, H>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("emails", &"EmailService")
            .field("templates", &"TemplateService")
            .field("history", &"HistoryService")
            .finish()
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use axum::http::{header::AUTHORIZATION, HeaderName, HeaderValue};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use chrono::Utc;

    use crate::domain::{
        emails::tests::MockEmailService, history::tests::MockHistoryService,
        templates::tests::MockTemplateService,
    };

    use super::*;

    /// Password configured in [`test_config`]
    pub const TEST_PASSWORD: &str = "letmein";

    pub fn test_config() -> AppConfig {
        AppConfig {
            api_title: "Email Service API".to_string(),
            api_description: "A microservice for sending emails".to_string(),
            api_version: "1.0.0".to_string(),
            docs_password: DocsPassword::new(TEST_PASSWORD),
        }
    }

    /// Basic credentials for [`TEST_PASSWORD`]
    pub fn authorized() -> (HeaderName, HeaderValue) {
        let encoded = STANDARD.encode(format!("admin:{TEST_PASSWORD}"));

        (
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {encoded}")).expect("valid header value"),
        )
    }

    pub fn test_state(
        emails: Option<MockEmailService>,
        templates: Option<MockTemplateService>,
        history: Option<MockHistoryService>,
    ) -> AppState<MockEmailService, MockTemplateService, MockHistoryService> {
        AppState {
            start_time: Utc::now(),
            config: test_config(),
            emails: Arc::new(emails.unwrap_or_default()),
            templates: Arc::new(templates.unwrap_or_default()),
            history: Arc::new(history.unwrap_or_default()),
        }
    }
}
