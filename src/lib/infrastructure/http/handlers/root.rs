//! Unauthenticated service information and liveness endpoints

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::state::AppState,
};

/// Service information
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfoResponse {
    /// Service name
    #[schema(example = "Email Service API")]
    pub service: String,

    /// Service version
    #[schema(example = "1.0.0")]
    pub version: String,

    /// Always `running`
    #[schema(example = "running")]
    pub status: String,

    /// Current server time in UTC
    pub timestamp: DateTime<Utc>,

    /// Path of the API documentation
    #[schema(example = "/docs")]
    pub docs: String,

    /// Path of the SMTP health check
    #[schema(example = "/email/health")]
    pub health: String,
}

/// Liveness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    /// Always `healthy` while the process serves requests
    #[schema(example = "healthy")]
    pub status: String,

    /// Service name
    #[schema(example = "Email Service API")]
    pub service: String,

    /// Current server time in UTC
    pub timestamp: DateTime<Utc>,
}

pub fn router<E, T, H>() -> Router<AppState<E, T, H>>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(liveness))
}

/// Describe the service
#[utoipa::path(
    get,
    operation_id = "service_info",
    tag = "System",
    path = "/",
    responses(
        (status = StatusCode::OK, description = "Service information", body = ServiceInfoResponse),
    )
)]
pub async fn service_info<E, T, H>(State(state): State<AppState<E, T, H>>) -> Json<ServiceInfoResponse>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Json(ServiceInfoResponse {
        service: state.config.api_title.clone(),
        version: state.config.api_version.clone(),
        status: "running".to_string(),
        timestamp: Utc::now(),
        docs: "/docs".to_string(),
        health: "/email/health".to_string(),
    })
}

/// Liveness check that does not touch the relay or the database
#[utoipa::path(
    get,
    operation_id = "liveness",
    tag = "System",
    path = "/health",
    responses(
        (status = StatusCode::OK, description = "The process is up", body = LivenessResponse),
    )
)]
pub async fn liveness<E, T, H>(State(state): State<AppState<E, T, H>>) -> Json<LivenessResponse>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Json(LivenessResponse {
        status: "healthy".to_string(),
        service: state.config.api_title.clone(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    use super::*;

    #[tokio::test]
    async fn test_service_info() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .get("/")
            .await;

        response.assert_status_ok();

        let json = response.json::<ServiceInfoResponse>();

        assert_eq!(json.service, "Email Service API");
        assert_eq!(json.version, "1.0.0");
        assert_eq!(json.status, "running");
        assert_eq!(json.docs, "/docs");
        assert_eq!(json.health, "/email/health");

        Ok(())
    }

    #[tokio::test]
    async fn test_liveness() -> TestResult {
        let response = TestServer::new(router(test_state(None, None, None)))?
            .get("/health")
            .await;

        response.assert_status_ok();

        let json = response.json::<LivenessResponse>();

        assert_eq!(json.status, "healthy");
        assert_eq!(json.service, "Email Service API");

        Ok(())
    }
}
