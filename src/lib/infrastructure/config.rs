//! Delivery configuration, read from flags and environment variables

use clap::Parser;
use thiserror::Error;

use crate::domain::communication::{
    delivery::{DeliveryConfig, SmtpSecurity, SmtpSettings},
    email_addresses::{EmailAddress, EmailAddressError},
};

/// Errors raised while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The default envelope sender is not a valid address
    #[error("invalid default envelope sender: {0}")]
    InvalidDefaultEnvelopeSender(#[from] EmailAddressError),
}

/// Mail delivery configuration
#[derive(Clone, Debug, Parser)]
pub struct DeliveryArgs {
    /// Send through SMTP instead of the local sendmail binary
    #[clap(long, env = "EMAIL_SMTP")]
    pub smtp: bool,

    /// The SMTP host
    #[clap(long, env = "EMAIL_SMTP_SERVER", default_value = "localhost")]
    pub smtp_server: String,

    /// The SMTP port
    #[clap(long, env = "EMAIL_SMTP_PORT", default_value = "25")]
    pub smtp_port: u16,

    /// SMTP security: empty for none, "tls" for STARTTLS or "ssl" for implicit TLS.
    /// Any non-empty mode also enables authentication.
    #[clap(long, env = "EMAIL_SMTP_AUTH", default_value = "")]
    pub smtp_auth: SmtpSecurity,

    /// The SMTP username
    #[clap(long, env = "EMAIL_SMTP_USERNAME", default_value = "")]
    pub smtp_username: String,

    /// The SMTP password
    #[clap(long, env = "EMAIL_SMTP_PASSWORD", default_value = "", hide_env_values = true)]
    pub smtp_password: String,

    /// The sendmail binary used when SMTP is disabled
    #[clap(long, env = "EMAIL_SENDMAIL_COMMAND")]
    pub sendmail_command: Option<String>,

    /// Rewrite every From to the default envelope sender
    #[clap(long, env = "EMAIL_FORCE_DEFAULT_ENVELOPE_SENDER")]
    pub force_default_envelope_sender: bool,

    /// The address every From is rewritten to
    #[clap(long, env = "EMAIL_DEFAULT_ENVELOPE_SENDER")]
    pub default_envelope_sender: Option<String>,

    /// The character set of text parts
    #[clap(long, env = "I18N_CLIENT_CHARSET", default_value = "utf-8")]
    pub client_charset: String,

    /// Log the SMTP exchange
    #[clap(long, env = "DEBUG_SHOW_STACKTRACE")]
    pub show_stacktrace: bool,

    /// Site title used when a request does not carry one
    #[clap(long, env = "SITE_TITLE", default_value = "")]
    pub site_title: String,
}

impl TryFrom<DeliveryArgs> for DeliveryConfig {
    type Error = ConfigError;

    fn try_from(args: DeliveryArgs) -> Result<Self, Self::Error> {
        let default_envelope_sender = args
            .default_envelope_sender
            .as_deref()
            .map(str::trim)
            .filter(|sender| !sender.is_empty())
            .map(EmailAddress::new)
            .transpose()?;

        Ok(Self {
            smtp: SmtpSettings {
                enabled: args.smtp,
                host: args.smtp_server,
                port: args.smtp_port,
                username: args.smtp_username,
                password: args.smtp_password,
                security: args.smtp_auth,
            },
            sendmail_command: args.sendmail_command,
            charset: args.client_charset,
            default_envelope_sender,
            force_default_envelope_sender: args.force_default_envelope_sender,
            debug: args.show_stacktrace,
        })
    }
}
