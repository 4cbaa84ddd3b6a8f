//! Mail send hook handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    domain::communication::delivery::{MailSender, MessageDescriptor, RequestContext},
    infrastructure::http::{
        errors::{ApiError, ErrorResponse},
        state::AppState,
    },
};

/// Send mail request body
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailBody {
    /// The email the host was about to send
    pub message: MessageDescriptor,

    /// The request that triggered the email
    #[serde(default)]
    pub context: RequestContext,
}

/// Send mail response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SendMailResponse {
    /// Whether the host should skip its own send path; always true
    #[schema(example = true)]
    pub handled: bool,

    /// Whether the email was accepted by the transport
    #[schema(example = true)]
    pub delivered: bool,
}

/// Deliver an email on behalf of the host
#[utoipa::path(
    post,
    operation_id = "send_mail",
    tag = "Mail",
    path = "/api/v1/mail/send",
    request_body = SendMailBody,
    responses(
        (status = 200, description = "Email handled, delivered or not", body = SendMailResponse),
        (status = 400, description = "Malformed JSON", body = ErrorResponse),
        (status = 422, description = "Unprocessable entity", body = ErrorResponse),
    )
)]
pub async fn handler<S: MailSender>(
    State(state): State<AppState<S>>,
    request: Result<Json<SendMailBody>, JsonRejection>,
) -> Result<Json<SendMailResponse>, ApiError> {
    let Json(request) = request?;

    let context = request
        .context
        .with_default_site_title(&state.config.site_title);

    let outcome = state
        .mail
        .deliver(&request.message, &state.delivery, &context)
        .await;

    Ok(Json(SendMailResponse {
        handled: outcome.handled(),
        delivered: outcome.is_delivered(),
    }))
}
