//! lettre mailer implementation: SMTP when enabled, sendmail otherwise

use async_trait::async_trait;
use lettre::{
    address::{Address, Envelope},
    message::{
        header::{
            ContentDisposition, ContentTransferEncoding, ContentType, HeaderName, HeaderValue,
        },
        Mailbox as LettreMailbox, MultiPart, SinglePart,
    },
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSendmailTransport, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::domain::communication::{
    delivery::{DeliveryConfig, SmtpSecurity},
    email_addresses::Mailbox,
    mailer::{Attachment, Mailer, MailerError, OutgoingMail},
};

/// The product identifier sent as `X-Mailer`
pub const X_MAILER: &str = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));

/// Headers the mailer writes itself; custom headers may not replace them
const RESERVED_HEADERS: [&str; 11] = [
    "From",
    "Sender",
    "Reply-To",
    "To",
    "Cc",
    "Bcc",
    "Subject",
    "X-Mailer",
    "Content-Type",
    "Content-Transfer-Encoding",
    "MIME-Version",
];

/// lettre mailer
///
/// A new transport is built for every email from the [`DeliveryConfig`]
/// passed in, so the mailer itself holds no state.
#[derive(Debug, Default, Clone)]
pub struct SmtpMailer;

impl SmtpMailer {
    /// Create a new mailer
    pub fn new() -> Self {
        Self
    }

    /// Build the SMTP transport described by `config`
    pub fn smtp_transport(
        &self,
        config: &DeliveryConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let smtp = &config.smtp;

        let relay = match smtp.security {
            SmtpSecurity::None => {
                let parameters =
                    TlsParameters::new(smtp.host.clone()).map_err(transport_error)?;

                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
                    .tls(Tls::Opportunistic(parameters))
            }
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
                .map_err(transport_error)?,
            SmtpSecurity::Ssl => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp.host).map_err(transport_error)?
            }
        };

        let relay = relay.port(smtp.port);

        let relay = if smtp.security.requires_auth() {
            relay.credentials(Credentials::new(smtp.username.clone(), smtp.password.clone()))
        } else {
            relay
        };

        if config.debug {
            info!(
                host = %smtp.host,
                port = smtp.port,
                security = %smtp.security,
                "opening SMTP transport"
            );
        }

        Ok(relay.build())
    }

    /// Build the sendmail transport described by `config`
    pub fn sendmail_transport(
        &self,
        config: &DeliveryConfig,
    ) -> AsyncSendmailTransport<Tokio1Executor> {
        match &config.sendmail_command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        }
    }

    /// Assemble the lettre [`Message`] for `mail`
    pub async fn build_message(
        &self,
        mail: &OutgoingMail,
        config: &DeliveryConfig,
    ) -> Result<Message, MailerError> {
        let from = match (&mail.from, &config.default_envelope_sender) {
            (Some(from), _) => lettre_mailbox(from)?,
            (None, Some(default_sender)) => {
                LettreMailbox::new(None, parse_address(default_sender.as_str())?)
            }
            (None, None) => return Err(MailerError::MissingSender),
        };

        let envelope_sender = match &mail.envelope_sender {
            Some(sender) => parse_address(sender)?,
            None => from.email.clone(),
        };

        let mut builder = Message::builder()
            .from(from)
            .subject(mail.subject.clone())
            .raw_header(HeaderValue::new(
                HeaderName::new_from_ascii_str("X-Mailer"),
                X_MAILER.to_string(),
            ));

        for mailbox in valid_mailboxes(&mail.reply_to, "Reply-To") {
            builder = builder.reply_to(mailbox);
        }

        let to = valid_mailboxes(&mail.to, "To");
        let cc = valid_mailboxes(&mail.cc, "Cc");
        let bcc = valid_mailboxes(&mail.bcc, "Bcc");

        let envelope = Envelope::new(
            Some(envelope_sender),
            to.iter()
                .chain(cc.iter())
                .chain(bcc.iter())
                .map(|mailbox| mailbox.email.clone())
                .collect(),
        )?;

        for mailbox in to {
            builder = builder.to(mailbox);
        }

        for mailbox in cc {
            builder = builder.cc(mailbox);
        }

        for mailbox in bcc {
            builder = builder.bcc(mailbox);
        }

        for header in &mail.headers {
            if is_reserved_header(&header.key) {
                warn!(header = %header.key, "skipping header the mailer sets itself");
                continue;
            }

            match HeaderName::new_from_ascii(header.key.clone()) {
                Ok(name) => {
                    builder = builder.raw_header(HeaderValue::new(name, header.value.clone()))
                }
                Err(_) => warn!(header = %header.key, "skipping header with an invalid name"),
            }
        }

        let body = MultiPart::alternative()
            .singlepart(text_part(
                content_type(&format!("text/plain; charset={}", config.charset))?,
                mail.plain_body.clone(),
            ))
            .singlepart(text_part(
                rich_content_type(mail.content_type.as_deref(), &config.charset)?,
                mail.html_body.clone(),
            ));

        let mut attachments = Vec::with_capacity(mail.attachments.len());
        for attachment in &mail.attachments {
            if let Some(part) = attachment_part(attachment).await {
                attachments.push(part);
            }
        }

        let builder = builder.envelope(envelope);

        let message = if attachments.is_empty() {
            builder.multipart(body)?
        } else {
            let mixed = attachments
                .into_iter()
                .fold(MultiPart::mixed().multipart(body), |mixed, part| {
                    mixed.singlepart(part)
                });

            builder.multipart(mixed)?
        };

        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail, config: &DeliveryConfig) -> Result<(), MailerError> {
        let message = self.build_message(mail, config).await?;

        if config.smtp.enabled {
            self.smtp_transport(config)?.send(message).await?;
        } else {
            self.sendmail_transport(config).send(message).await?;
        }

        Ok(())
    }
}

fn transport_error(err: lettre::transport::smtp::Error) -> MailerError {
    MailerError::TransportError(err.to_string())
}

fn parse_address(raw: &str) -> Result<Address, MailerError> {
    raw.trim()
        .parse::<Address>()
        .map_err(|err| MailerError::InvalidEmail {
            address: raw.to_string(),
            reason: err.to_string(),
        })
}

fn lettre_mailbox(mailbox: &Mailbox) -> Result<LettreMailbox, MailerError> {
    Ok(LettreMailbox::new(
        mailbox.display_name().map(str::to_string),
        parse_address(&mailbox.email)?,
    ))
}

fn valid_mailboxes(mailboxes: &[Mailbox], field: &str) -> Vec<LettreMailbox> {
    mailboxes
        .iter()
        .filter_map(|mailbox| match lettre_mailbox(mailbox) {
            Ok(mailbox) => Some(mailbox),
            Err(err) => {
                warn!(field, "skipping address: {err}");
                None
            }
        })
        .collect()
}

fn is_reserved_header(name: &str) -> bool {
    let name = name.trim();

    RESERVED_HEADERS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

fn content_type(raw: &str) -> Result<ContentType, MailerError> {
    ContentType::parse(raw)
        .map_err(|err| MailerError::BuildError(format!("invalid content type \"{raw}\": {err}")))
}

fn rich_content_type(
    content_type_override: Option<&str>,
    charset: &str,
) -> Result<ContentType, MailerError> {
    let raw = content_type_override
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .unwrap_or("text/html");

    if raw.to_ascii_lowercase().contains("charset=") {
        content_type(raw)
    } else {
        content_type(&format!("{raw}; charset={charset}"))
    }
}

fn text_part(content_type: ContentType, body: String) -> SinglePart {
    SinglePart::builder()
        .header(content_type)
        .header(ContentTransferEncoding::Base64)
        .body(body)
}

async fn attachment_part(attachment: &Attachment) -> Option<SinglePart> {
    let content = match tokio::fs::read(&attachment.path).await {
        Ok(content) => content,
        Err(err) => {
            warn!(
                path = %attachment.path.display(),
                "skipping attachment that could not be read: {err}"
            );
            return None;
        }
    };

    let content_type = ContentType::parse(&attachment.content_type).unwrap_or_else(|_| {
        warn!(
            content_type = %attachment.content_type,
            "unknown attachment content type, sending as octet-stream"
        );
        ContentType::parse("application/octet-stream").unwrap_or(ContentType::TEXT_PLAIN)
    });

    Some(
        SinglePart::builder()
            .header(content_type)
            .header(ContentDisposition::attachment(&attachment.filename))
            .header(ContentTransferEncoding::Base64)
            .body(content),
    )
}
