//! OpenAPI module

use utoipa::OpenApi;

use crate::infrastructure::http::{
    errors::ErrorResponse,
    handlers::{api, email, root},
    state::AppConfig,
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Email Service API"),
    paths(
        root::service_info,
        root::liveness,
        email::send::handler,
        email::send_html::handler,
        email::send_template::handler,
        email::health::handler,
        api::templates::list,
        api::templates::get_one,
        api::templates::create,
        api::templates::update,
        api::templates::delete,
        api::send_history::list,
        api::send_history::get_one,
    ),
    components(schemas(
        root::ServiceInfoResponse,
        root::LivenessResponse,
        email::EmailResponse,
        email::send::SendEmailBody,
        email::send::EmailType,
        email::send_html::SendHtmlEmailBody,
        email::send_template::SendTemplateEmailBody,
        email::health::HealthResponse,
        api::templates::TemplateBody,
        api::templates::TemplateResponse,
        api::templates::TemplateMutationResponse,
        api::templates::TemplateDeletedResponse,
        api::send_history::HistoryRecordResponse,
        ErrorResponse,
    )),
    modifiers(&BasicAuth),
    tags(
        (name = "Email", description = "Send emails"),
        (name = "Templates", description = "Manage stored templates"),
        (name = "History", description = "Inspect sent emails"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDocs;

/// Registers the Basic scheme guarding the management routes
#[derive(Debug)]
struct BasicAuth;

impl utoipa::Modify for BasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
            );
        }
    }
}

/// The OpenAPI document with title, description and version taken from `config`
pub fn api_docs(config: &AppConfig) -> utoipa::openapi::OpenApi {
    let mut openapi = ApiDocs::openapi();

    openapi.info.title = config.api_title.clone();
    openapi.info.description = Some(config.api_description.clone());
    openapi.info.version = config.api_version.clone();

    openapi
}
