//! Email message

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::communication::email_addresses::Mailbox;

/// A custom header line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomHeader {
    /// The header name
    #[schema(example = "X-Journal-Id")]
    pub key: String,

    /// The header value
    #[serde(alias = "content")]
    #[schema(example = "42")]
    pub value: String,
}

impl CustomHeader {
    /// Create a new header
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// A file on disk to attach to the email
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    /// Where the file lives
    #[schema(value_type = String, example = "/var/files/submission.pdf")]
    pub path: PathBuf,

    /// The filename shown to recipients
    #[schema(example = "submission.pdf")]
    pub filename: String,

    /// The MIME type of the file
    #[serde(alias = "content-type")]
    #[schema(example = "application/pdf")]
    pub content_type: String,
}

/// An email ready to be handed to a [`Mailer`](super::Mailer).
///
/// Every sender decision has already been made: `from` is the visible
/// RFC 5322 From header and `envelope_sender` is the RFC 5321 MAIL FROM.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutgoingMail {
    /// The From header
    pub from: Option<Mailbox>,

    /// The envelope sender used for bounces
    pub envelope_sender: Option<String>,

    /// Reply-To addresses
    pub reply_to: Vec<Mailbox>,

    /// To addresses
    pub to: Vec<Mailbox>,

    /// Cc addresses
    pub cc: Vec<Mailbox>,

    /// Bcc addresses, never written to the headers
    pub bcc: Vec<Mailbox>,

    /// The subject of the email
    pub subject: String,

    /// The HTML body of the email
    pub html_body: String,

    /// The plain text body of the email
    pub plain_body: String,

    /// Replaces `text/html` on the rich body part
    pub content_type: Option<String>,

    /// Sanitized custom headers, in order
    pub headers: Vec<CustomHeader>,

    /// Files to attach
    pub attachments: Vec<Attachment>,
}

impl OutgoingMail {
    /// Every envelope recipient: to, cc and bcc, in that order
    pub fn recipients(&self) -> impl Iterator<Item = &Mailbox> {
        self.to.iter().chain(self.cc.iter()).chain(self.bcc.iter())
    }
}
