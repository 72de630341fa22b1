use std::sync::Arc;
use tracing::{info, warn};

use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::shared::DomainError;

use super::{EmailNotifier, EmailTemplates, LogNotifier};
use crate::config::{AppConfig, TimeoutConfig};

/// Create the notifier for the configured delivery channel
pub fn create_notifier(config: &AppConfig) -> Result<Arc<dyn ReminderNotifier>, DomainError> {
    let templates = EmailTemplates::load(&config.templates_path)?;

    if !config.smtp.is_configured() {
        warn!("SMTP is not configured, notifications will only be logged");
        return Ok(Arc::new(LogNotifier::new(templates)));
    }

    let timeouts = TimeoutConfig::from_scheduler(&config.scheduler);
    let notifier = EmailNotifier::new(&config.smtp, templates, timeouts.smtp)?;
    info!(
        "📧 Email notifications via {}:{}",
        config.smtp.host, config.smtp.port
    );
    Ok(Arc::new(notifier))
}
