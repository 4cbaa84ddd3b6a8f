//! Maps a message descriptor onto an outgoing mail

use crate::domain::communication::{
    email_addresses::Mailbox,
    mailer::{CustomHeader, OutgoingMail},
};

use super::{
    headers::secure_header,
    sender::{resolve_sender, same_address},
    substitution::substitute_private_params,
    DeliveryConfig, MessageDescriptor, RequestContext,
};

/// The header carrying the end user's address
pub const ORIGINATING_IP_HEADER: &str = "X-Originating-IP";

/// Build the [`OutgoingMail`] for `descriptor`.
///
/// This is everything `deliver` does short of talking to a transport. The
/// descriptor is not modified.
pub fn compose(
    descriptor: &MessageDescriptor,
    config: &DeliveryConfig,
    context: &RequestContext,
) -> OutgoingMail {
    let body = substitute_private_params(&descriptor.body, descriptor.private_params.as_ref());

    let mut headers: Vec<CustomHeader> = descriptor
        .headers
        .iter()
        .map(|header| CustomHeader {
            key: header.key.clone(),
            value: secure_header(&header.value),
        })
        .collect();

    let sender = resolve_sender(descriptor, config, &context.site_title);

    let mut reply_to: Vec<Mailbox> = Vec::new();
    for mailbox in sender
        .promoted_reply_to
        .into_iter()
        .chain(descriptor.reply_to.iter().cloned())
    {
        if !reply_to.iter().any(|existing| same_address(existing, &mailbox)) {
            reply_to.push(mailbox);
        }
    }

    let remote_addr = secure_header(&context.remote_addr);
    if !remote_addr.is_empty() {
        headers.push(CustomHeader::new(ORIGINATING_IP_HEADER, &remote_addr));
    }

    OutgoingMail {
        from: sender.from,
        envelope_sender: sender.envelope_sender,
        reply_to,
        to: descriptor.recipients.clone(),
        cc: descriptor.cc.clone(),
        bcc: descriptor.bcc.clone(),
        subject: descriptor.subject.clone(),
        plain_body: nanohtml2text::html2text(&body),
        html_body: body,
        content_type: descriptor.content_type.clone(),
        headers,
        attachments: descriptor.attachments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use crate::domain::communication::{
        delivery::PrivateParams, email_addresses::EmailAddress, mailer::Attachment,
    };

    use super::*;

    fn forced_config() -> DeliveryConfig {
        DeliveryConfig {
            force_default_envelope_sender: true,
            default_envelope_sender: Some(EmailAddress::new_unchecked("noreply@y.com")),
            ..Default::default()
        }
    }

    fn descriptor() -> MessageDescriptor {
        MessageDescriptor {
            body: "<p>Dear %NAME%,</p><p>Thanks.</p>".to_string(),
            private_params: Some([("%NAME%", "Alice")].into_iter().collect::<PrivateParams>()),
            from: Some(Mailbox::new("a@x.com", "A")),
            reply_to: vec![Mailbox::new("editor@x.com", "Editor")],
            recipients: vec![
                Mailbox::new("alice@example.com", "Alice"),
                Mailbox::new("bob@example.com", "Bob"),
            ],
            cc: vec![Mailbox::new("cc@example.com", "")],
            bcc: vec![Mailbox::new("archive@example.com", "")],
            subject: "Submission received".to_string(),
            headers: vec![CustomHeader::new("X-Journal", "jex\r\nBcc: evil@example.com")],
            attachments: vec![Attachment {
                path: PathBuf::from("/tmp/a.pdf"),
                filename: "a.pdf".to_string(),
                content_type: "application/pdf".to_string(),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_override_composes_dmarc_aligned_mail() {
        let context = RequestContext::new("203.0.113.7", "MyJournal");

        let mail = compose(&descriptor(), &forced_config(), &context);

        assert_eq!(mail.from, Some(Mailbox::new("noreply@y.com", "A via MyJournal")));
        assert_eq!(mail.envelope_sender.as_deref(), Some("noreply@y.com"));
        assert_eq!(
            mail.reply_to,
            vec![
                Mailbox::new("a@x.com", "A"),
                Mailbox::new("editor@x.com", "Editor")
            ]
        );
    }

    #[test]
    fn test_promoted_reply_to_appears_once_per_delivery() {
        let context = RequestContext::new("", "MyJournal");
        let descriptor = descriptor();
        let config = forced_config();

        for _ in 0..2 {
            let mail = compose(&descriptor, &config, &context);

            let promoted = mail
                .reply_to
                .iter()
                .filter(|mailbox| **mailbox == Mailbox::new("a@x.com", "A"))
                .count();

            assert_eq!(promoted, 1);
        }

        assert_eq!(descriptor.reply_to.len(), 1, "descriptor must not change");
    }

    #[test]
    fn test_reply_to_never_repeats_an_address() {
        let mut descriptor = descriptor();
        descriptor.from = Some(Mailbox::new("A@x.com", "A"));
        descriptor.reply_to = vec![
            Mailbox::new("editor@x.com", "Editor"),
            Mailbox::new("EDITOR@x.com", "Editor again"),
        ];

        let mail = compose(&descriptor, &forced_config(), &RequestContext::new("", "MyJournal"));

        assert_eq!(
            mail.reply_to,
            vec![
                Mailbox::new("A@x.com", "A"),
                Mailbox::new("editor@x.com", "Editor")
            ]
        );
    }

    #[test]
    fn test_promoted_sender_is_not_repeated_in_other_case() {
        let mut descriptor = descriptor();
        descriptor.from = Some(Mailbox::new("A@x.com", "A"));
        descriptor.reply_to = vec![Mailbox::new("a@x.com", "A")];

        let mail = compose(&descriptor, &forced_config(), &RequestContext::new("", "MyJournal"));

        assert_eq!(mail.reply_to, vec![Mailbox::new("a@x.com", "A")]);
    }

    #[test]
    fn test_recipients_are_copied_in_order() {
        let mail = compose(&descriptor(), &DeliveryConfig::default(), &RequestContext::default());

        assert_eq!(
            mail.recipients().map(|m| m.email.as_str()).collect::<Vec<_>>(),
            vec![
                "alice@example.com",
                "bob@example.com",
                "cc@example.com",
                "archive@example.com"
            ]
        );
        assert_eq!(mail.reply_to, vec![Mailbox::new("editor@x.com", "Editor")]);
    }

    #[test]
    fn test_body_is_substituted_and_has_plain_alternative() {
        let mail = compose(&descriptor(), &DeliveryConfig::default(), &RequestContext::default());

        assert_eq!(mail.html_body, "<p>Dear Alice,</p><p>Thanks.</p>");
        assert!(mail.plain_body.contains("Dear Alice,"));
        assert!(!mail.plain_body.contains("<p>"));
    }

    #[test]
    fn test_custom_header_values_are_sanitized() {
        let mail = compose(&descriptor(), &DeliveryConfig::default(), &RequestContext::default());

        assert_eq!(
            mail.headers,
            vec![CustomHeader::new("X-Journal", "jexBcc: evil@example.com")]
        );
    }

    #[test]
    fn test_originating_ip_header_is_appended() {
        let context = RequestContext::new("203.0.113.7\r\n", "MyJournal");

        let mail = compose(&descriptor(), &DeliveryConfig::default(), &context);

        assert_eq!(
            mail.headers.last(),
            Some(&CustomHeader::new(ORIGINATING_IP_HEADER, "203.0.113.7"))
        );
    }

    #[test]
    fn test_blank_remote_addr_adds_no_header() {
        let context = RequestContext::new("\r\n", "MyJournal");

        let mail = compose(&descriptor(), &DeliveryConfig::default(), &context);

        assert!(mail
            .headers
            .iter()
            .all(|header| header.key != ORIGINATING_IP_HEADER));
    }

    #[test]
    fn test_content_type_and_attachments_are_carried() {
        let mut descriptor = descriptor();
        descriptor.content_type = Some("text/plain".to_string());

        let mail = compose(&descriptor, &DeliveryConfig::default(), &RequestContext::default());

        assert_eq!(mail.content_type.as_deref(), Some("text/plain"));
        assert_eq!(mail.attachments, descriptor.attachments);
        assert_eq!(mail.subject, "Submission received");
    }
}
