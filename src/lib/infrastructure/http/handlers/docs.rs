//! API documentation.

use axum::{extract::State, response::Html, routing::get, Json, Router};
use utoipa::openapi::OpenApi;

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::{open_api::api_docs, state::AppState},
};

pub fn router<E, T, H>() -> Router<AppState<E, T, H>>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Router::new()
        .route("/docs", get(stoplight))
        .route("/openapi.json", get(openapi_json))
}

/// Stoplight API documentation.
pub async fn stoplight<E, T, H>(State(state): State<AppState<E, T, H>>) -> Html<String>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Html(format!(
        r#"
<html lang="en">
<head>
    <title>{title}</title>
    <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
</head>
<body>
    <main role="main">
        <elements-api apiDescriptionUrl="/openapi.json" router="hash" />
    </main>
</body>
</html>
"#,
        title = state.config.api_title
    ))
}

/// The OpenAPI document
pub async fn openapi_json<E, T, H>(State(state): State<AppState<E, T, H>>) -> Json<OpenApi>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Json(api_docs(&state.config))
}
