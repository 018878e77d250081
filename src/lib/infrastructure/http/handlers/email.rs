//! Email sending endpoints

use axum::{
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        emails::{EmailAddress, EmailService, Recipients, SenderOverride},
        history::HistoryService,
        templates::TemplateService,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

pub mod health;
pub mod send;
pub mod send_html;
pub mod send_template;

pub fn router<E, T, H>() -> Router<AppState<E, T, H>>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Router::new()
        .route("/send", post(send::handler))
        .route("/send-html", post(send_html::handler))
        .route("/send-template", post(send_template::handler))
        .route("/health", get(health::handler))
}

/// Outcome of a send
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EmailResponse {
    /// Whether the relay accepted the message
    pub success: bool,

    /// Human readable outcome
    #[schema(example = "Email sent successfully")]
    pub message: String,

    /// Identifier of the send, also used as the history record identifier
    pub email_id: Option<Uuid>,
}

impl EmailResponse {
    fn sent(message: &str, email_id: Uuid) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            email_id: Some(email_id),
        }
    }
}

fn addresses(raw: &[String]) -> Result<Vec<EmailAddress>, ApiError> {
    raw.iter()
        .map(|address| EmailAddress::new(address).map_err(ApiError::from))
        .collect()
}

/// Validate the addressing fields shared by every send request
fn recipients(
    to: &[String],
    cc: Option<&[String]>,
    bcc: Option<&[String]>,
) -> Result<Recipients, ApiError> {
    Ok(Recipients::new(
        addresses(to)?,
        addresses(cc.unwrap_or_default())?,
        addresses(bcc.unwrap_or_default())?,
    )?)
}

fn sender(from_email: Option<&str>, from_name: Option<&str>) -> Result<SenderOverride, ApiError> {
    Ok(SenderOverride {
        email: from_email.map(EmailAddress::new).transpose()?,
        name: from_name.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_recipients_validates_every_list() {
        let to = vec!["a@example.com".to_string()];
        let bad = vec!["not an email".to_string()];

        assert!(recipients(&to, None, None).is_ok());
        assert!(recipients(&to, Some(&bad), None).is_err());
        assert!(recipients(&to, None, Some(&bad)).is_err());
        assert!(recipients(&bad, None, None).is_err());
        assert!(recipients(&[], None, None).is_err());
    }

    #[test]
    fn test_sender_override() -> TestResult {
        let overridden = sender(Some("team@example.com"), Some("Team"))?;

        assert_eq!(
            overridden.email.map(String::from).as_deref(),
            Some("team@example.com")
        );
        assert_eq!(overridden.name.as_deref(), Some("Team"));

        assert_eq!(sender(None, None)?, SenderOverride::default());

        Ok(())
    }
}
