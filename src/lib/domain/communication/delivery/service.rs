//! Outbound mail adapter

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::mailer::Mailer;

use super::{compose::compose, DeliveryConfig, MessageDescriptor, RequestContext};

/// The result of a delivery attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The transport accepted the email
    Delivered,

    /// The transport failed and the failure was logged
    FailedLogged,
}

impl DeliveryOutcome {
    /// Whether the host should skip its own send path.
    ///
    /// Always `true`: a failed delivery is logged here and must never
    /// abort the host's workflow.
    pub fn handled(&self) -> bool {
        true
    }

    /// Whether the email actually left
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

/// Delivers the emails a host would otherwise send itself
#[async_trait]
pub trait MailSender: Send + Sync + 'static {
    /// Delivers an email.
    ///
    /// # Arguments
    /// * `descriptor` - The [`MessageDescriptor`] composed by the host.
    /// * `config` - The process-wide [`DeliveryConfig`].
    /// * `context` - The [`RequestContext`] of the triggering request.
    ///
    /// # Returns
    /// A [`DeliveryOutcome`]; failures are never returned as errors.
    async fn deliver(
        &self,
        descriptor: &MessageDescriptor,
        config: &DeliveryConfig,
        context: &RequestContext,
    ) -> DeliveryOutcome;
}

#[cfg(test)]
mock! {
    pub MailSender {}

    #[async_trait]
    impl MailSender for MailSender {
        async fn deliver(
            &self,
            descriptor: &MessageDescriptor,
            config: &DeliveryConfig,
            context: &RequestContext,
        ) -> DeliveryOutcome;
    }
}

/// Outbound mail adapter: composes the email and makes a single send attempt
#[derive(Debug)]
pub struct OutboundMailAdapter<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
}

impl<M> Clone for OutboundMailAdapter<M>
where
    M: Mailer,
{
    fn clone(&self) -> Self {
        Self {
            mailer: Arc::clone(&self.mailer),
        }
    }
}

impl<M> OutboundMailAdapter<M>
where
    M: Mailer,
{
    /// Creates a new adapter sending through `mailer`.
    pub fn new(mailer: Arc<M>) -> Self {
        Self { mailer }
    }
}

#[async_trait]
impl<M> MailSender for OutboundMailAdapter<M>
where
    M: Mailer,
{
    async fn deliver(
        &self,
        descriptor: &MessageDescriptor,
        config: &DeliveryConfig,
        context: &RequestContext,
    ) -> DeliveryOutcome {
        let mail = compose(descriptor, config, context);

        match self.mailer.send(&mail, config).await {
            Ok(()) => {
                info!(
                    subject = %mail.subject,
                    recipients = mail.recipients().count(),
                    "email delivered"
                );

                DeliveryOutcome::Delivered
            }
            Err(err) => {
                error!(subject = %mail.subject, "email delivery failed: {err}");

                DeliveryOutcome::FailedLogged
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use crate::{
        domain::communication::{
            email_addresses::{EmailAddress, Mailbox},
            mailer::{tests::MockMailer, MailerError},
        },
        infrastructure::logging::tests::LogBuffer,
    };

    use super::*;

    fn descriptor() -> MessageDescriptor {
        MessageDescriptor {
            from: Some(Mailbox::new("a@x.com", "A")),
            recipients: vec![Mailbox::new("reader@example.com", "Reader")],
            subject: "Review request".to_string(),
            body: "<p>Please review.</p>".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_deliver_success() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|mail, _| mail.subject == "Review request" && mail.to.len() == 1)
            .returning(|_, _| Ok(()));

        let adapter = OutboundMailAdapter::new(Arc::new(mailer));

        let outcome = adapter
            .deliver(&descriptor(), &DeliveryConfig::default(), &RequestContext::default())
            .await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);
        assert!(outcome.handled());
        assert!(outcome.is_delivered());

        Ok(())
    }

    #[tokio::test]
    async fn test_deliver_passes_overridden_sender_to_mailer() -> TestResult {
        let config = DeliveryConfig {
            force_default_envelope_sender: true,
            default_envelope_sender: Some(EmailAddress::new("noreply@y.com")?),
            ..Default::default()
        };

        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .withf(|mail, config| {
                mail.from == Some(Mailbox::new("noreply@y.com", "A via MyJournal"))
                    && mail.reply_to == vec![Mailbox::new("a@x.com", "A")]
                    && config.force_default_envelope_sender
            })
            .returning(|_, _| Ok(()));

        let adapter = OutboundMailAdapter::new(Arc::new(mailer));

        let outcome = adapter
            .deliver(&descriptor(), &config, &RequestContext::new("", "MyJournal"))
            .await;

        assert_eq!(outcome, DeliveryOutcome::Delivered);

        Ok(())
    }

    #[tokio::test]
    async fn test_deliver_failure_is_logged_and_handled() -> TestResult {
        let logs = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .returning(|_, _| Err(MailerError::SendError("connection refused".to_string())));

        let adapter = OutboundMailAdapter::new(Arc::new(mailer));

        let outcome = adapter
            .deliver(&descriptor(), &DeliveryConfig::default(), &RequestContext::default())
            .await;

        assert_eq!(outcome, DeliveryOutcome::FailedLogged);
        assert!(outcome.handled());
        assert!(!outcome.is_delivered());

        let logs = logs.contents();
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("connection refused"));

        Ok(())
    }

    #[tokio::test]
    async fn test_deliver_makes_a_single_attempt() -> TestResult {
        let mut mailer = MockMailer::new();

        mailer
            .expect_send()
            .times(1)
            .returning(|_, _| Err(MailerError::MissingSender));

        let adapter = OutboundMailAdapter::new(Arc::new(mailer));

        let outcome = adapter
            .deliver(
                &MessageDescriptor::default(),
                &DeliveryConfig::default(),
                &RequestContext::default(),
            )
            .await;

        assert_eq!(outcome, DeliveryOutcome::FailedLogged);

        Ok(())
    }
}
