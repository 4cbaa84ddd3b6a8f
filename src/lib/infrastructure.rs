//! Infrastructure: configuration, logging, the lettre mailer and the HTTP hook

pub mod config;
pub mod email;
pub mod http;
pub mod logging;
