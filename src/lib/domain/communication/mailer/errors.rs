//! Mailer errors

use thiserror::Error;

/// Mailer errors
#[derive(Debug, Error)]
pub enum MailerError {
    /// An address could not be parsed
    #[error("invalid email address \"{address}\": {reason}")]
    InvalidEmail {
        /// The offending address
        address: String,

        /// Why it was rejected
        reason: String,
    },

    /// There is no From address and no default to fall back on
    #[error("no sender address: set a From address or a default envelope sender")]
    MissingSender,

    /// The message could not be assembled
    #[error("could not build the email: {0}")]
    BuildError(String),

    /// The transport could not be configured
    #[error("could not configure the mail transport: {0}")]
    TransportError(String),

    /// The transport rejected the email
    #[error("could not send the email: {0}")]
    SendError(String),
}

impl From<lettre::error::Error> for MailerError {
    fn from(err: lettre::error::Error) -> Self {
        MailerError::BuildError(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for MailerError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailerError::SendError(err.to_string())
    }
}

impl From<lettre::transport::sendmail::Error> for MailerError {
    fn from(err: lettre::transport::sendmail::Error) -> Self {
        MailerError::SendError(err.to_string())
    }
}
