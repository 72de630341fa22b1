mod app_config;
mod timeouts;

pub use app_config::{AppConfig, SchedulerSettings, SmtpSettings};
pub use timeouts::TimeoutConfig;
