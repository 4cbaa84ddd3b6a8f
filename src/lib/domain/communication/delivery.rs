//! Delivery module: turns a host's message descriptor into a sent email.

mod compose;
mod config;
mod context;
mod descriptor;
mod headers;
mod sender;
mod service;
mod substitution;

pub use compose::{compose, ORIGINATING_IP_HEADER};
pub use config::{DeliveryConfig, SmtpSecurity, SmtpSecurityError, SmtpSettings};
pub use context::RequestContext;
pub use descriptor::{MessageDescriptor, PrivateParams};
pub use headers::secure_header;
pub use sender::{resolve_sender, ResolvedSender};
pub use service::{DeliveryOutcome, MailSender, OutboundMailAdapter};
pub use substitution::substitute_private_params;
