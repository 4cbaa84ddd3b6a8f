//! Version 1 of the API

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::communication::delivery::MailSender,
    infrastructure::http::{open_api::ApiDocs, state::AppState},
};

pub mod mail;
pub mod stoplight;
pub mod uptime;

/// Routes under `/api/v1`
pub fn router<S: MailSender>() -> Router<AppState<S>> {
    Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler::<S>))
        .route("/mail/send", post(mail::send::handler::<S>))
}
