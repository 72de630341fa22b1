use std::sync::Arc;
use std::time::Duration;

use streakkeeper_domain::check_in::CheckInRepository;
use streakkeeper_domain::clock::Clock;
use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::reminder::ReminderRepository;
use streakkeeper_domain::user::UserRepository;
use streakkeeper_infrastructure::config::SchedulerSettings;

/// Cadence of the two scheduler loops
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub reminder_tick: Duration,
    pub missed_sweep_hour: u8,
    pub missed_sweep_minute: u8,
    pub notification_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::from(&SchedulerSettings::default())
    }
}

impl From<&SchedulerSettings> for SchedulerConfig {
    fn from(settings: &SchedulerSettings) -> Self {
        Self {
            reminder_tick: Duration::from_secs(settings.reminder_tick_secs),
            missed_sweep_hour: settings.missed_sweep_hour,
            missed_sweep_minute: settings.missed_sweep_minute,
            notification_timeout: Duration::from_secs(settings.notification_timeout_secs),
        }
    }
}

/// Outcome of one pass over the records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Records that needed a notification
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    /// Records dropped because their data could not be read
    pub skipped: usize,
}

/// Collaborators shared by both loops
pub(super) struct SchedulerContext {
    pub user_repo: Arc<dyn UserRepository>,
    pub check_in_repo: Arc<dyn CheckInRepository>,
    pub reminder_repo: Arc<dyn ReminderRepository>,
    pub notifier: Arc<dyn ReminderNotifier>,
    pub clock: Arc<dyn Clock>,
    pub notification_timeout: Duration,
}
