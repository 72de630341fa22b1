mod missed_sweep;
mod reminder_tick;
mod task_spawner;
mod types;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use streakkeeper_domain::check_in::CheckInRepository;
use streakkeeper_domain::clock::Clock;
use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::reminder::ReminderRepository;
use streakkeeper_domain::user::UserRepository;

pub use types::{SchedulerConfig, TickReport};
use types::SchedulerContext;

/// Drives the reminder tick and the daily missed check-in sweep.
///
/// Both loops share the repositories and notifier and stop cooperatively:
/// a tick that has started always finishes its batch.
pub struct ReminderScheduler {
    context: Arc<SchedulerContext>,
    config: SchedulerConfig,
    shutdown: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl ReminderScheduler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        check_in_repo: Arc<dyn CheckInRepository>,
        reminder_repo: Arc<dyn ReminderRepository>,
        notifier: Arc<dyn ReminderNotifier>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);

        Self {
            context: Arc::new(SchedulerContext {
                user_repo,
                check_in_repo,
                reminder_repo,
                notifier,
                clock,
                notification_timeout: config.notification_timeout,
            }),
            config,
            shutdown,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Spawn both loops. Calling it while running is a no-op.
    pub async fn start(&self) {
        let mut tasks = self.tasks.lock().await;
        if !tasks.is_empty() {
            warn!("⚠️  Reminder scheduler already running");
            return;
        }

        self.shutdown.send_replace(false);
        tasks.push(self.spawn_reminder_loop());
        tasks.push(self.spawn_missed_sweep_loop());

        info!(
            "✅ Reminder scheduler started (tick every {}s, missed sweep at {}:{:02})",
            self.config.reminder_tick.as_secs(),
            self.config.missed_sweep_hour,
            self.config.missed_sweep_minute
        );
    }

    /// Ask both loops to stop and wait until they have exited
    pub async fn stop(&self) {
        let handles: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
        if handles.is_empty() {
            return;
        }

        info!("🛑 Stopping reminder scheduler...");
        self.shutdown.send_replace(true);

        for handle in handles {
            if let Err(e) = handle.await {
                error!("❌ Scheduler task ended abnormally: {}", e);
            }
        }

        info!("✅ Reminder scheduler stopped");
    }

    pub async fn is_running(&self) -> bool {
        !self.tasks.lock().await.is_empty()
    }

    /// One reminder pass at the clock's current time
    pub async fn run_reminder_tick(&self) -> TickReport {
        self.context.run_reminder_tick().await
    }

    /// One missed check-in pass at the clock's current time
    pub async fn run_missed_check_in_sweep(&self) -> TickReport {
        self.context.run_missed_check_in_sweep().await
    }
}
