//! Delivery configuration

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::domain::communication::email_addresses::EmailAddress;

/// How the SMTP connection is secured.
///
/// Any mode other than [`SmtpSecurity::None`] also turns on authentication.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// No authentication; STARTTLS is used if the server offers it
    #[default]
    None,

    /// STARTTLS is required
    Tls,

    /// Implicit TLS from the first byte
    Ssl,
}

/// An unrecognised security mode
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown SMTP security mode \"{0}\", expected \"\", \"tls\" or \"ssl\"")]
pub struct SmtpSecurityError(pub String);

impl FromStr for SmtpSecurity {
    type Err = SmtpSecurityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "tls" | "starttls" => Ok(Self::Tls),
            "ssl" => Ok(Self::Ssl),
            other => Err(SmtpSecurityError(other.to_string())),
        }
    }
}

impl fmt::Display for SmtpSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, ""),
            Self::Tls => write!(f, "tls"),
            Self::Ssl => write!(f, "ssl"),
        }
    }
}

impl SmtpSecurity {
    /// Whether credentials are sent to the server
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// SMTP connection settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmtpSettings {
    /// Send through SMTP; sendmail is used otherwise
    pub enabled: bool,

    /// The SMTP host
    pub host: String,

    /// The SMTP port
    pub port: u16,

    /// The SMTP username
    pub username: String,

    /// The SMTP password
    pub password: String,

    /// The security mode
    pub security: SmtpSecurity,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "localhost".to_string(),
            port: 25,
            username: String::new(),
            password: String::new(),
            security: SmtpSecurity::None,
        }
    }
}

/// Process-wide delivery configuration, read-only once loaded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryConfig {
    /// SMTP settings
    pub smtp: SmtpSettings,

    /// Path to the sendmail binary, when SMTP is disabled
    pub sendmail_command: Option<String>,

    /// The character set of text parts
    pub charset: String,

    /// The address used as From when the override is forced
    pub default_envelope_sender: Option<EmailAddress>,

    /// Rewrite every From to the default envelope sender
    pub force_default_envelope_sender: bool,

    /// Log the transport's protocol exchange
    pub debug: bool,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            smtp: SmtpSettings::default(),
            sendmail_command: None,
            charset: "utf-8".to_string(),
            default_envelope_sender: None,
            force_default_envelope_sender: false,
            debug: false,
        }
    }
}

impl DeliveryConfig {
    /// The address that replaces every From, if the override applies
    pub fn forced_sender(&self) -> Option<&EmailAddress> {
        if self.force_default_envelope_sender {
            self.default_envelope_sender.as_ref()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_security_modes() {
        assert_eq!("".parse(), Ok(SmtpSecurity::None));
        assert_eq!("tls".parse(), Ok(SmtpSecurity::Tls));
        assert_eq!("SSL".parse(), Ok(SmtpSecurity::Ssl));
        assert_eq!(
            "smime".parse::<SmtpSecurity>(),
            Err(SmtpSecurityError("smime".to_string()))
        );
    }

    #[test]
    fn test_only_secured_modes_authenticate() {
        assert!(!SmtpSecurity::None.requires_auth());
        assert!(SmtpSecurity::Tls.requires_auth());
        assert!(SmtpSecurity::Ssl.requires_auth());
    }

    #[test]
    fn test_forced_sender_needs_flag_and_address() {
        let mut config = DeliveryConfig {
            default_envelope_sender: Some(EmailAddress::new_unchecked("noreply@example.com")),
            ..Default::default()
        };

        assert_eq!(config.forced_sender(), None);

        config.force_default_envelope_sender = true;
        assert_eq!(
            config.forced_sender().map(EmailAddress::as_str),
            Some("noreply@example.com")
        );

        config.default_envelope_sender = None;
        assert_eq!(config.forced_sender(), None);
    }
}
