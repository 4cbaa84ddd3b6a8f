//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::domain::communication::delivery::{DeliveryConfig, MailSender};

/// Application configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Site title used when a hook request does not carry one
    pub site_title: String,
}

/// Global application state
pub struct AppState<S: MailSender> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// The delivery configuration, loaded once at startup
    pub delivery: Arc<DeliveryConfig>,

    /// Mail sender
    pub mail: Arc<S>,
}

/// Implementation of the application state
impl<S> AppState<S>
where
    S: MailSender,
{
    /// Create a new application state
    pub fn new(config: AppConfig, delivery: DeliveryConfig, mail: S) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            delivery: Arc::new(delivery),
            mail: Arc::new(mail),
        }
    }
}

impl<S> Clone for AppState<S>
where
    S: MailSender,
{
    fn clone(&self) -> Self {
        Self {
            start_time: self.start_time,
            config: self.config.clone(),
            delivery: Arc::clone(&self.delivery),
            mail: Arc::clone(&self.mail),
        }
    }
}

impl<S> fmt::Debug for AppState<S>
where
    S: MailSender,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("delivery", &self.delivery)
            .field("mail", &"MailSender")
            .finish()
    }
}
