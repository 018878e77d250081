//! Send an email rendered from a stored template

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

/// Send template email request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendTemplateEmailBody {
    /// Primary recipients
    #[schema(example = json!(["user@example.com"]))]
    pub to: Vec<String>,

    /// Subject line
    #[schema(example = "Welcome")]
    pub subject: String,

    /// Name of the stored template
    #[schema(example = "welcome")]
    pub template_name: String,

    /// Data the template is rendered against
    #[serde(default)]
    #[schema(value_type = Object, example = json!({"name": "Ada"}))]
    pub template_data: TemplateData,

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

impl TryFrom<SendTemplateEmailBody> for NewEmail {
    type Error = ApiError;

    fn try_from(body: SendTemplateEmailBody) -> Result<Self, Self::Error> {
        Ok(NewEmail {
            recipients: recipients(&body.to, body.cc.as_deref(), body.bcc.as_deref())?,
            subject: body.subject,
            sender: sender(body.from_email.as_deref(), body.from_name.as_deref())?,
            content: EmailContent::Template {
                name: body.template_name,
                data: body.template_data,
            },
        })
    }
}

/// Render a stored template and send the result
#[utoipa::path(
    post,
    operation_id = "send_template_email",
    tag = "Email",
    path = "/email/send-template",
    request_body = SendTemplateEmailBody,
    responses(
        (status = StatusCode::OK, description = "Email sent", body = EmailResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid request", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Template not found", body = ErrorResponse, example = json!({"error": "Template 'welcome' not found"})),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Rendering failed or the relay rejected the message", body = ErrorResponse),
        (status = StatusCode::SERVICE_UNAVAILABLE, description = "The relay could not be reached", body = ErrorResponse),
    )
)]
pub async fn handler<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    request: Result<Json<SendTemplateEmailBody>, JsonRejection>,
) -> Result<Json<EmailResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Json(request) = request?;
    let email: NewEmail = request.try_into()?;

    let id = state.emails.send(&email).await?;

    Ok(Json(EmailResponse::sent(
        "Template email sent successfully",
        id,
    )))
}
