//! Send a plain text or HTML email

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{
        emails::{EmailContent, EmailService, NewEmail},
        history::HistoryService,
        templates::TemplateService,
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        handlers::email::{recipients, sender, EmailResponse},
        state::AppState,
    },
};

/// How `body` is sent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    /// `text/plain`
    #[default]
    Plain,

    /// `text/html`
    Html,
}

/// Send email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendEmailBody {
    /// Primary recipients
    #[schema(example = json!(["user@example.com"]))]
    pub to: Vec<String>,

    /// Subject line
    #[schema(example = "Hello")]
    pub subject: String,

    /// Message body
    #[schema(example = "Hello from the email service")]
    pub body: String,

    /// Carbon-copy recipients
    #[serde(default)]
    pub cc: Option<Vec<String>>,

    /// Blind carbon-copy recipients
    #[serde(default)]
    pub bcc: Option<Vec<String>>,

    /// Sender address, defaults to the configured one
    #[serde(default)]
    pub from_email: Option<String>,

    /// Sender display name, defaults to the configured one
    #[serde(default)]
    pub from_name: Option<String>,

    /// Body format
    #[serde(default)]
    pub email_type: EmailType,
}

impl TryFrom<SendEmailBody> for NewEmail {
    type Error = ApiError;

    fn try_from(body: SendEmailBody) -> Result<Self, Self::Error> {
        let content = match body.email_type {
            EmailType::Plain => EmailContent::Plain { body: body.body },
            EmailType::Html => EmailContent::SimpleHtml { body: body.body },
        };

        Ok(NewEmail {
            recipients: recipients(&body.to, body.cc.as_deref(), body.bcc.as_deref())?,
            subject: body.subject,
            sender: sender(body.from_email.as_deref(), body.from_name.as_deref())?,
            content,
        })
    }
}

/// Send a plain text or HTML email
#[utoipa::path(
    post,
    operation_id = "send_email",
    tag = "Email",
    path = "/email/send",
    request_body = SendEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = EmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid request", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "The relay rejected the message", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "The relay could not be reached", body = ErrorResponse),
    )
)]
pub async fn handler<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    request: Result<Json<SendEmailBody>, JsonRejection>,
) -> Result<Json<EmailResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Json(request) = request?;
    let email: NewEmail = request.try_into()?;

    let id = state.emails.send(&email).await?;

    Ok(Json(EmailResponse::sent("Email sent successfully", id)))
}
