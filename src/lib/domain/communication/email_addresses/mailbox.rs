//! Mailbox: an address with an optional display name

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An email address paired with a display name, as supplied by the host.
///
/// The address is kept as the host sent it; it is only parsed when the
/// transport message is built. An empty name means "no display name".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mailbox {
    /// The email address
    #[schema(example = "author@example.com")]
    pub email: String,

    /// The display name
    #[serde(default)]
    #[schema(example = "Jane Author")]
    pub name: String,
}

impl Mailbox {
    /// Create a new mailbox
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    /// The display name, if it is not blank
    pub fn display_name(&self) -> Option<&str> {
        let name = self.name.trim();

        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_has_no_display_name() {
        assert_eq!(Mailbox::new("a@example.com", "  ").display_name(), None);
    }

    #[test]
    fn test_display_name_is_trimmed() {
        assert_eq!(
            Mailbox::new("a@example.com", " Jane ").display_name(),
            Some("Jane")
        );
    }

    #[test]
    fn test_name_defaults_to_empty_when_missing() -> testresult::TestResult {
        let mailbox: Mailbox = serde_json::from_str(r#"{"email":"a@example.com"}"#)?;

        assert_eq!(mailbox, Mailbox::new("a@example.com", ""));

        Ok(())
    }
}
