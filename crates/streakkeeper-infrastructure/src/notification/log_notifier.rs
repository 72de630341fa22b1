use async_trait::async_trait;
use tracing::info;

use streakkeeper_domain::notification::{NotificationKind, ReminderNotifier};
use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::user::User;

use super::EmailTemplates;

/// Notifier used when no SMTP server is configured. Renders the message and
/// writes it to the log instead of delivering it.
pub struct LogNotifier {
    templates: EmailTemplates,
}

impl LogNotifier {
    pub fn new(templates: EmailTemplates) -> Self {
        Self { templates }
    }

    fn emit(&self, kind: NotificationKind, user: &User) -> Result<(), DomainError> {
        let message = self.templates.render(kind, user)?;
        info!(
            user_id = %user.id(),
            kind = %kind,
            title = %message.title,
            "Notification (not delivered, SMTP disabled) for {}",
            user.username()
        );
        Ok(())
    }
}

#[async_trait]
impl ReminderNotifier for LogNotifier {
    async fn send_daily_reminder(&self, user: &User) -> Result<(), DomainError> {
        self.emit(NotificationKind::DailyReminder, user)
    }

    async fn send_hourly_reminder(&self, user: &User) -> Result<(), DomainError> {
        self.emit(NotificationKind::HourlyReminder, user)
    }

    async fn send_missed_warning(&self, user: &User) -> Result<(), DomainError> {
        self.emit(NotificationKind::MissedCheckInWarning, user)
    }

    async fn send_welcome(&self, user: &User) -> Result<(), DomainError> {
        self.emit(NotificationKind::Welcome, user)
    }

    async fn send_test(&self, user: &User) -> Result<(), DomainError> {
        self.emit(NotificationKind::TestEmail, user)
    }
}
