use std::time::Duration;
use tracing::debug;

use streakkeeper_domain::notification::{NotificationKind, ReminderNotifier};
use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::user::User;

/// Send one notification, giving up after `timeout`.
///
/// A timed-out send is reported as [`DomainError::Timeout`] and is treated
/// like any other failed send by the callers.
pub(crate) async fn send_with_timeout(
    notifier: &dyn ReminderNotifier,
    kind: NotificationKind,
    user: &User,
    timeout: Duration,
) -> Result<(), DomainError> {
    debug!(user_id = %user.id(), kind = %kind, "Dispatching notification");

    let send = async {
        match kind {
            NotificationKind::DailyReminder => notifier.send_daily_reminder(user).await,
            NotificationKind::HourlyReminder => notifier.send_hourly_reminder(user).await,
            NotificationKind::MissedCheckInWarning => notifier.send_missed_warning(user).await,
            NotificationKind::Welcome => notifier.send_welcome(user).await,
            NotificationKind::TestEmail => notifier.send_test(user).await,
        }
    };

    match tokio::time::timeout(timeout, send).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::Timeout(format!(
            "{} for user {} did not finish within {}s",
            kind,
            user.username(),
            timeout.as_secs_f32()
        ))),
    }
}
