//! Sender resolution
//!
//! Decides the visible From header, the envelope sender and any Reply-To
//! promotion needed when every From is rewritten to an address the relay
//! controls (DMARC alignment).

use crate::domain::communication::email_addresses::Mailbox;

use super::{DeliveryConfig, MessageDescriptor};

/// The outcome of sender resolution
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedSender {
    /// The RFC 5322 From header
    pub from: Option<Mailbox>,

    /// The RFC 5321 MAIL FROM
    pub envelope_sender: Option<String>,

    /// The original sender, promoted to Reply-To
    pub promoted_reply_to: Option<Mailbox>,
}

/// Whether two mailboxes share an address, ignoring case
pub fn same_address(a: &Mailbox, b: &Mailbox) -> bool {
    a.email.trim().eq_ignore_ascii_case(b.email.trim())
}

/// Resolve the sender of `descriptor`.
///
/// With the override forced and a default envelope sender configured, the
/// original From is promoted to Reply-To (unless already there) and replaced
/// by `"<name> via <site title>" <default envelope sender>`. An explicit
/// envelope sender on the descriptor always wins for MAIL FROM.
pub fn resolve_sender(
    descriptor: &MessageDescriptor,
    config: &DeliveryConfig,
    site_title: &str,
) -> ResolvedSender {
    let mut resolved = ResolvedSender::default();

    if let Some(from) = &descriptor.from {
        let from = match config.forced_sender() {
            Some(default_sender) => {
                let already_reply_to = descriptor
                    .reply_to
                    .iter()
                    .any(|reply_to| same_address(reply_to, from));

                if !already_reply_to {
                    resolved.promoted_reply_to = Some(from.clone());
                }

                Mailbox {
                    email: default_sender.to_string(),
                    name: format!("{} via {}", from.name, site_title),
                }
            }
            None => from.clone(),
        };

        resolved.envelope_sender = Some(from.email.clone());
        resolved.from = Some(from);
    }

    if let Some(envelope_sender) = &descriptor.envelope_sender {
        resolved.envelope_sender = Some(envelope_sender.clone());
    }

    resolved
}
