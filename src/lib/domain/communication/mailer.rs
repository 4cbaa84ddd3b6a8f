//! Mailer port

mod errors;
mod message;

use async_trait::async_trait;

#[cfg(test)]
use mockall::mock;

pub use errors::MailerError;
pub use message::{Attachment, CustomHeader, OutgoingMail};

use crate::domain::communication::delivery::DeliveryConfig;

/// Sends composed emails
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send an email
    ///
    /// # Arguments
    /// * `mail` - The [`OutgoingMail`] to send.
    /// * `config` - The [`DeliveryConfig`] the transport is built from.
    ///
    /// # Returns
    /// A [`Result`] indicating success or failure.
    async fn send(&self, mail: &OutgoingMail, config: &DeliveryConfig) -> Result<(), MailerError>;
}

#[cfg(test)]
mock! {
    pub Mailer {}

    #[async_trait]
    impl Mailer for Mailer {
        async fn send(
            &self,
            mail: &OutgoingMail,
            config: &DeliveryConfig,
        ) -> Result<(), MailerError>;
    }
}
