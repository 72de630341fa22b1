use chrono::{DateTime, Local, Utc};
use tracing::{error, info, warn};

use streakkeeper_domain::notification::NotificationKind;
use streakkeeper_domain::reminder::ReminderSubscription;

use crate::application::services::dispatch::send_with_timeout;
use super::types::{SchedulerContext, TickReport};

impl SchedulerContext {
    /// Fire every subscription whose due time has passed, once each
    pub(super) async fn run_reminder_tick(&self) -> TickReport {
        let now = self.clock.now();
        let now_utc = now.with_timezone(&Utc);
        let mut report = TickReport::default();

        let subscriptions = match self.reminder_repo.find_enabled().await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                error!("❌ [REMINDER] Failed to load subscriptions: {}", e);
                return report;
            }
        };

        for subscription in subscriptions {
            if !subscription.is_due(now_utc) {
                continue;
            }
            report.due += 1;
            self.fire(subscription, &now, &mut report).await;
        }

        report
    }

    async fn fire(
        &self,
        mut subscription: ReminderSubscription,
        now: &DateTime<Local>,
        report: &mut TickReport,
    ) {
        let user_id = subscription.user_id().clone();

        let user = match self.user_repo.find_by_id(&user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("⚠️  [REMINDER] User {} not found, skipping", user_id);
                report.skipped += 1;
                return;
            }
            Err(e) => {
                error!("❌ [REMINDER] Failed to load user {}: {}", user_id, e);
                report.skipped += 1;
                return;
            }
        };

        let kind = NotificationKind::for_frequency(subscription.frequency());
        if let Err(e) =
            send_with_timeout(self.notifier.as_ref(), kind, &user, self.notification_timeout).await
        {
            if e.is_recoverable() {
                warn!(
                    "⚠️  [REMINDER] Failed to send {} to {}, retrying next tick: {}",
                    kind,
                    user.username(),
                    e.format_with_code()
                );
            } else {
                error!(
                    "❌ [REMINDER] Failed to send {} to {}: {}",
                    kind,
                    user.username(),
                    e.format_with_code()
                );
            }
            report.failed += 1;
            return;
        }
        report.sent += 1;

        // The reminder went out; a failed lookup only loses the check-in basis
        let last_check_in = match self.check_in_repo.find_latest_at(&user_id).await {
            Ok(at) => at,
            Err(e) => {
                warn!(
                    "⚠️  [REMINDER] Failed to load last check-in for {}: {}",
                    user.username(),
                    e
                );
                None
            }
        };

        subscription.record_fired(last_check_in, now);

        if let Err(e) = self.reminder_repo.save(&subscription).await {
            error!(
                "❌ [REMINDER] Failed to persist schedule for {}: {}",
                user.username(),
                e
            );
            return;
        }

        info!(
            "✅ [REMINDER] {} sent to {}, next due {}",
            kind,
            user.username(),
            subscription
                .next_due()
                .map(|due| due.to_rfc3339())
                .unwrap_or_else(|| "-".to_string())
        );
    }
}
