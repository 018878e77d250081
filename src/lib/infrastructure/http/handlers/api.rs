//! Template management and send history, behind the Basic guard

use axum::{routing::get, Router};

use crate::{
    domain::{emails::EmailService, history::HistoryService, templates::TemplateService},
    infrastructure::http::state::AppState,
};

pub mod send_history;
pub mod templates;

pub fn router<E, T, H>() -> Router<AppState<E, T, H>>
where
    E: EmailService,
    T: TemplateService,
    H: HistoryService,
{
    Router::new()
        .route("/templates", get(templates::list).post(templates::create))
        .route(
            "/templates/:name",
            get(templates::get_one)
                .put(templates::update)
                .delete(templates::delete),
        )
        .route("/send-history", get(send_history::list))
        .route("/send-history/:id", get(send_history::get_one))
}
