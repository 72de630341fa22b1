use tracing::{error, info};

use streakkeeper_domain::check_in::MissedCheckInDetector;
use streakkeeper_domain::notification::NotificationKind;

use crate::application::services::dispatch::send_with_timeout;
use super::types::{SchedulerContext, TickReport};

impl SchedulerContext {
    /// Warn every user with no check-in today or yesterday. Reads only.
    pub(super) async fn run_missed_check_in_sweep(&self) -> TickReport {
        let now = self.clock.now();
        let since = MissedCheckInDetector::window_start(&now);
        let mut report = TickReport::default();

        let users = match self.user_repo.find_all().await {
            Ok(users) => users,
            Err(e) => {
                error!("❌ [MISSED] Failed to load users: {}", e);
                return report;
            }
        };

        for user in users {
            let events = match self.check_in_repo.find_since(user.id(), since).await {
                Ok(events) => events,
                Err(e) => {
                    error!(
                        "❌ [MISSED] Failed to load check-ins for {}: {}",
                        user.username(),
                        e
                    );
                    report.skipped += 1;
                    continue;
                }
            };

            if !MissedCheckInDetector::is_missed(&events, &now) {
                continue;
            }
            report.due += 1;

            match send_with_timeout(
                self.notifier.as_ref(),
                NotificationKind::MissedCheckInWarning,
                &user,
                self.notification_timeout,
            )
            .await
            {
                Ok(()) => {
                    report.sent += 1;
                    info!("📨 [MISSED] Warning sent to {}", user.username());
                }
                Err(e) => {
                    report.failed += 1;
                    error!(
                        "❌ [MISSED] Failed to warn {}: {}",
                        user.username(),
                        e
                    );
                }
            }
        }

        report
    }
}
