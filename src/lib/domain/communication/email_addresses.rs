//! Email addresses module.

mod email_address;
mod mailbox;

pub use email_address::{EmailAddress, EmailAddressError};
pub use mailbox::Mailbox;
