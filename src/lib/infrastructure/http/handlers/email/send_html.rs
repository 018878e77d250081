//! Send an HTML email

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
        templates::{TemplateData, TemplateService},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        handlers::email::{recipients, sender, EmailResponse},
        state::AppState,
    },
};

/// Send HTML email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendHtmlEmailBody {
    /// Primary recipients
    #[schema(example = json!(["user@example.com"]))]
    pub to: Vec<String>,

    /// Subject line
    #[schema(example = "Hello")]
    pub subject: String,

    /// HTML body. Rendered as a template first when `variables` is given.
    #[schema(example = "<h1>Hello {{ name }}</h1>")]
    pub html_body: String,

    /// Plain text alternative
    #[serde(default)]
    pub text_body: Option<String>,

    /// Variables for `html_body`
    #[serde(default)]
    #[schema(value_type = Option<Object>, example = json!({"name": "Ada"}))]
    pub variables: Option<TemplateData>,

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
}

impl TryFrom<SendHtmlEmailBody> for NewEmail {
    type Error = ApiError;

    fn try_from(body: SendHtmlEmailBody) -> Result<Self, Self::Error> {
        Ok(NewEmail {
            recipients: recipients(&body.to, body.cc.as_deref(), body.bcc.as_deref())?,
            subject: body.subject,
            sender: sender(body.from_email.as_deref(), body.from_name.as_deref())?,
            content: EmailContent::Html {
                html: body.html_body,
                text: body.text_body,
                variables: body.variables,
            },
        })
    }
}

/// Send an HTML email, optionally with a plain text alternative
#[utoipa::path(
    post,
    operation_id = "send_html_email",
    tag = "Email",
    path = "/email/send-html",
    request_body = SendHtmlEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = EmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid request", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Rendering failed or the relay rejected the message", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "The relay could not be reached", body = ErrorResponse),
    )
)]
pub async fn handler<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    request: Result<Json<SendHtmlEmailBody>, JsonRejection>,
) -> Result<Json<EmailResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Json(request) = request?;
    let email: NewEmail = request.try_into()?;

    let id = state.emails.send(&email).await?;

    Ok(Json(EmailResponse::sent("HTML email sent successfully", id)))
}
