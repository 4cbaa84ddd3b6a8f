//! Request context

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Ambient details of the request that triggered the email
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RequestContext {
    /// The remote address of the end user, empty when unknown
    #[serde(default)]
    #[schema(example = "203.0.113.7")]
    pub remote_addr: String,

    /// The localized title of the site
    #[serde(default)]
    #[schema(example = "Journal of Examples")]
    pub site_title: String,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(remote_addr: &str, site_title: &str) -> Self {
        Self {
            remote_addr: remote_addr.to_string(),
            site_title: site_title.to_string(),
        }
    }

    /// Fill in the site title when the caller did not send one
    pub fn with_default_site_title(mut self, site_title: &str) -> Self {
        if self.site_title.trim().is_empty() {
            self.site_title = site_title.to_string();
        }

        self
    }
}
