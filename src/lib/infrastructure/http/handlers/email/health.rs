//! SMTP health check

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::state::AppState,
};

/// The health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` when the relay accepted a session, `unhealthy` otherwise
    #[schema(example = "healthy")]
    pub status: String,

    /// Service name
    #[schema(example = "Email Service API")]
    pub service: String,

    /// Service version
    #[schema(example = "1.0.0")]
    pub version: String,

    /// Current server time in UTC
    pub timestamp: DateTime<Utc>,
}

/// Check that the relay accepts a session. Always answers 200.
#[utoipa::path(
    get,
    operation_id = "email_health",
    tag = "Email",
    path = "/email/health",
    responses(
        (status = StatusCode::OK, description = "Relay status", body = HealthResponse),
    )
)]
pub async fn handler<E, T, H>(State(state): State<AppState<E, T, H>>) -> Json<HealthResponse>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    let status = if state.emails.check_connection().await {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        service: state.config.api_title.clone(),
        version: state.config.api_version.clone(),
        timestamp: Utc::now(),
    })
}
