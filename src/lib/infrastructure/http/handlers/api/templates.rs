//! Template CRUD handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        emails::EmailService,
        history::HistoryService,
        templates::{NewTemplate, Template, TemplateService},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Template request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateBody {
    /// Unique template name
    #[schema(example = "welcome")]
    pub name: String,

    /// HTML source with Jinja-style placeholders
    #[schema(example = "<h1>Welcome {{ name }}</h1>")]
    pub content: String,
}

impl TryFrom<TemplateBody> for NewTemplate {
    type Error = ApiError;

    fn try_from(body: TemplateBody) -> Result<Self, Self::Error> {
        Ok(NewTemplate::new(&body.name, &body.content)?)
    }
}

/// A stored template
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    /// Template identifier
    pub id: Uuid,

    /// Unique template name
    #[schema(example = "welcome")]
    pub name: String,

    /// HTML source
    pub content: String,

    /// Created at date in UTC
    pub created_at: DateTime<Utc>,

    /// Last updated at date in UTC
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        Self {
            id: template.id,
            name: template.name,
            content: template.content,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

/// Outcome of a create or update
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateMutationResponse {
    /// Always `true`
    pub success: bool,

    /// Human readable outcome
    #[schema(example = "Template created successfully")]
    pub message: String,

    /// The template as stored
    pub template: TemplateResponse,
}

/// Outcome of a delete
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateDeletedResponse {
    /// Always `true`
    pub success: bool,

    /// Human readable outcome
    #[schema(example = "Template deleted successfully")]
    pub message: String,
}

/// List every stored template
#[utoipa::path(
    get,
    operation_id = "list_templates",
    tag = "Templates",
    path = "/api/templates",
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "Stored templates, sorted by name", body = Vec<TemplateResponse>),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn list<E, T, H>(
    State(state): State<AppState<E, T, H>>,
) -> Result<Json<Vec<TemplateResponse>>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let templates = state.templates.list_templates().await?;

    Ok(Json(
        templates.into_iter().map(TemplateResponse::from).collect(),
    ))
}

/// Get a template by name
#[utoipa::path(
    get,
    operation_id = "get_template",
    tag = "Templates",
    path = "/api/templates/{name}",
    params(("name" = String, Path, description = "Template name")),
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "The template", body = TemplateResponse),
        (status = StatusCode::NOT_FOUND, description = "Template not found", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn get_one<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    Path(name): Path<String>,
) -> Result<Json<TemplateResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let template = state.templates.get_template(&name).await?;

    Ok(Json(template.into()))
}

/// Create a template
#[utoipa::path(
    post,
    operation_id = "create_template",
    tag = "Templates",
    path = "/api/templates",
    request_body = TemplateBody,
    security(("basic" = [])),
    responses(
        (status = StatusCode::CREATED, description = "Template created", body = TemplateMutationResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid template", body = ErrorResponse),
        (status = StatusCode::CONFLICT, description = "Name already taken", body = ErrorResponse, example = json!({"error": "Template 'welcome' already exists"})),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn create<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    request: Result<Json<TemplateBody>, JsonRejection>,
) -> Result<(StatusCode, Json<TemplateMutationResponse>), ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Json(request) = request?;
    let new_template: NewTemplate = request.try_into()?;

    let template = state.templates.create_template(&new_template).await?;

    Ok((
        StatusCode::CREATED,
        Json(TemplateMutationResponse {
            success: true,
            message: "Template created successfully".to_string(),
            template: template.into(),
        }),
    ))
}

/// Replace a template's name and content
#[utoipa::path(
    put,
    operation_id = "update_template",
    tag = "Templates",
    path = "/api/templates/{name}",
    params(("name" = String, Path, description = "Current template name")),
    request_body = TemplateBody,
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "Template updated", body = TemplateMutationResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid template", body = ErrorResponse),
        (status = StatusCode::NOT_FOUND, description = "Template not found", body = ErrorResponse),
        (status = StatusCode::CONFLICT, description = "New name already taken", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn update<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    Path(name): Path<String>,
    request: Result<Json<TemplateBody>, JsonRejection>,
) -> Result<Json<TemplateMutationResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Json(request) = request?;
    let new_template: NewTemplate = request.try_into()?;

    let template = state.templates.update_template(&name, &new_template).await?;

    Ok(Json(TemplateMutationResponse {
        success: true,
        message: "Template updated successfully".to_string(),
        template: template.into(),
    }))
}

/// Delete a template
#[utoipa::path(
    delete,
    operation_id = "delete_template",
    tag = "Templates",
    path = "/api/templates/{name}",
    params(("name" = String, Path, description = "Template name")),
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "Template deleted", body = TemplateDeletedResponse),
        (status = StatusCode::NOT_FOUND, description = "Template not found", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn delete<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    Path(name): Path<String>,
) -> Result<Json<TemplateDeletedResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    state.templates.delete_template(&name).await?;

    Ok(Json(TemplateDeletedResponse {
        success: true,
        message: "Template deleted successfully".to_string(),
    }))
}
