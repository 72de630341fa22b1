use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::{AsyncTransport, Message};
use tracing::info;

use streakkeeper_domain::notification::{NotificationKind, ReminderNotifier};
use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::user::User;

use super::EmailNotifier;

impl EmailNotifier {
    async fn send_kind(&self, kind: NotificationKind, user: &User) -> Result<(), DomainError> {
        let message = self.templates.render(kind, user)?;
        let to = Self::parse_recipient(user.email())?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.title)
            .header(ContentType::TEXT_PLAIN)
            .body(message.content)
            .map_err(|e| DomainError::Notification(format!("Failed to build email: {}", e)))?;

        self.transport.send(email).await.map_err(|e| {
            DomainError::Notification(format!("Failed to send {} email: {}", kind, e))
        })?;

        info!(user_id = %user.id(), kind = %kind, "📧 Email sent to {}", user.email());
        Ok(())
    }
}

#[async_trait]
impl ReminderNotifier for EmailNotifier {
    async fn send_daily_reminder(&self, user: &User) -> Result<(), DomainError> {
        self.send_kind(NotificationKind::DailyReminder, user).await
    }

    async fn send_hourly_reminder(&self, user: &User) -> Result<(), DomainError> {
        self.send_kind(NotificationKind::HourlyReminder, user).await
    }

    async fn send_missed_warning(&self, user: &User) -> Result<(), DomainError> {
        self.send_kind(NotificationKind::MissedCheckInWarning, user)
            .await
    }

    async fn send_welcome(&self, user: &User) -> Result<(), DomainError> {
        self.send_kind(NotificationKind::Welcome, user).await
    }

    async fn send_test(&self, user: &User) -> Result<(), DomainError> {
        self.send_kind(NotificationKind::TestEmail, user).await
    }
}
