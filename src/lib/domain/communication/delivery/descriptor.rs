//! Message descriptor

use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use utoipa::ToSchema;

use crate::domain::communication::{
    email_addresses::Mailbox,
    mailer::{Attachment, CustomHeader},
};

/// Placeholder tokens and their replacements, in the order the caller gave them.
///
/// Order matters: replacements are applied one after the other, so this is
/// kept as a list of pairs and (de)serialized as a JSON object without
/// sorting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrivateParams(Vec<(String, String)>);

impl PrivateParams {
    /// Create params from ordered pairs
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    /// The pairs, in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(token, value)| (token.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PrivateParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(token, value)| (token.into(), value.into()))
                .collect(),
        )
    }
}

impl Serialize for PrivateParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;

        for (token, value) in &self.0 {
            map.serialize_entry(token, value)?;
        }

        map.end()
    }
}

struct PrivateParamsVisitor;

impl<'de> Visitor<'de> for PrivateParamsVisitor {
    type Value = PrivateParams;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map of placeholder tokens to replacement text")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut pairs = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some(pair) = access.next_entry::<String, String>()? {
            pairs.push(pair);
        }

        Ok(PrivateParams(pairs))
    }
}

impl<'de> Deserialize<'de> for PrivateParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PrivateParamsVisitor)
    }
}

/// A fully composed email, as handed over by the host
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageDescriptor {
    /// The HTML body, possibly containing placeholder tokens
    #[serde(default)]
    #[schema(example = "<p>Dear %NAME%,</p>")]
    pub body: String,

    /// Placeholder substitutions applied to the body
    #[serde(default)]
    #[schema(value_type = Option<Object>, example = json!({"%NAME%": "Jane"}))]
    pub private_params: Option<PrivateParams>,

    /// The sender
    #[serde(default)]
    pub from: Option<Mailbox>,

    /// An explicit envelope sender, overriding any computed one
    #[serde(default)]
    #[schema(example = "bounces@example.com")]
    pub envelope_sender: Option<String>,

    /// Reply-To addresses
    #[serde(default)]
    pub reply_to: Vec<Mailbox>,

    /// To addresses
    #[serde(default)]
    pub recipients: Vec<Mailbox>,

    /// Cc addresses
    #[serde(default)]
    pub cc: Vec<Mailbox>,

    /// Bcc addresses
    #[serde(default)]
    pub bcc: Vec<Mailbox>,

    /// The subject
    #[serde(default)]
    #[schema(example = "Submission received")]
    pub subject: String,

    /// Replaces the `text/html` type of the body
    #[serde(default)]
    pub content_type: Option<String>,

    /// Custom headers
    #[serde(default)]
    pub headers: Vec<CustomHeader>,

    /// Files to attach
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}
