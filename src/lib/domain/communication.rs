//! Outgoing email: addresses, delivery policy and the mailer port.

pub mod delivery;
pub mod email_addresses;
pub mod mailer;
