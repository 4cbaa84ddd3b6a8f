//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::communication::{
        delivery::{MessageDescriptor, RequestContext},
        email_addresses::Mailbox,
        mailer::{Attachment, CustomHeader},
    },
    infrastructure::http::{errors::ErrorResponse, handlers::v1::*},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Global Sender Relay"),
    paths(mail::send::handler, uptime::handler),
    components(schemas(
        mail::send::SendMailBody,
        mail::send::SendMailResponse,
        uptime::UptimeResponse,
        MessageDescriptor,
        RequestContext,
        Mailbox,
        CustomHeader,
        Attachment,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;
