//! Send history handlers

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::{
        emails::EmailService,
        history::{HistoryRecord, HistoryService, DEFAULT_HISTORY_LIMIT},
        templates::{TemplateData, TemplateService},
    },
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// History query parameters
#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// Maximum number of records, between 1 and 500
    #[param(example = 50)]
    pub limit: Option<u32>,
}

/// A recorded send
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryRecordResponse {
    /// Identifier returned by the send
    pub id: Uuid,

    /// Primary recipients
    pub to: Vec<String>,

    /// Number of primary recipients
    pub recipients_count: usize,

    /// Subject line
    pub subject: String,

    /// When the send was recorded
    pub timestamp: DateTime<Utc>,

    /// Outcome
    #[schema(example = "sent")]
    pub status: String,

    /// Template used, if any
    pub template_name: Option<String>,

    /// Template variables
    #[schema(value_type = Object)]
    pub template_variables: TemplateData,

    /// First 500 characters of the HTML body
    pub html_body_preview: Option<String>,

    /// Full HTML body
    pub html_body_full: Option<String>,
}

impl From<HistoryRecord> for HistoryRecordResponse {
    fn from(record: HistoryRecord) -> Self {
        Self {
            id: record.id,
            to: record.to,
            recipients_count: record.recipients_count,
            subject: record.subject,
            timestamp: record.timestamp,
            status: record.status,
            template_name: record.template_name,
            template_variables: record.template_variables,
            html_body_preview: record.html_body_preview,
            html_body_full: record.html_body_full,
        }
    }
}

/// Most recent sends, newest first
#[utoipa::path(
    get,
    operation_id = "list_send_history",
    tag = "History",
    path = "/api/send-history",
    params(HistoryQuery),
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "Recent sends", body = Vec<HistoryRecordResponse>),
        (status = StatusCode::BAD_REQUEST, description = "Invalid limit", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn list<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> Result<Json<Vec<HistoryRecordResponse>>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let Query(query) = query.map_err(|rejection| ApiError::new_400(&rejection.body_text()))?;

    let records = state
        .history
        .list_recent(query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await?;

    Ok(Json(
        records.into_iter().map(HistoryRecordResponse::from).collect(),
    ))
}

/// A single send by identifier
#[utoipa::path(
    get,
    operation_id = "get_send_history",
    tag = "History",
    path = "/api/send-history/{id}",
    params(("id" = String, Path, description = "Send identifier")),
    security(("basic" = [])),
    responses(
        (status = StatusCode::OK, description = "The send", body = HistoryRecordResponse),
        (status = StatusCode::NOT_FOUND, description = "No send with that identifier", body = ErrorResponse),
        (status = StatusCode::UNAUTHORIZED, description = "Missing or invalid credentials", body = ErrorResponse),
    )
)]
pub async fn get_one<E, T, H>(
    State(state): State<AppState<E, T, H>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryRecordResponse>, ApiError>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let record = state.history.get_record(&id).await?;

    Ok(Json(record.into()))
}
