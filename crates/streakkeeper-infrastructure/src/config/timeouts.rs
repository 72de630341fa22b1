use std::time::Duration;

use super::app_config::SchedulerSettings;

/// Timeout durations used across the engine
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Upper bound for a single notification send
    pub notification_send: Duration,

    /// SMTP connection/command timeout
    pub smtp: Duration,

    /// Waiting for a database connection from the pool
    pub db_acquire: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            notification_send: Duration::from_secs(30),
            smtp: Duration::from_secs(20),
            db_acquire: Duration::from_secs(10),
        }
    }
}

impl TimeoutConfig {
    /// Defaults with the notification bound taken from scheduler settings
    pub fn from_scheduler(settings: &SchedulerSettings) -> Self {
        Self {
            notification_send: Duration::from_secs(settings.notification_timeout_secs),
            ..Self::default()
        }
    }
}
