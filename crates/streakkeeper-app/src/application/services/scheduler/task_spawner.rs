use chrono::{DateTime, NaiveDate, TimeZone};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{info, warn};

/// Retry delay when the sweep time does not exist on the local clock
const UNRESOLVED_SWEEP_RETRY: Duration = Duration::from_secs(3600);

impl super::ReminderScheduler {
    /// Reminder tick every `period`, first one a full period after start
    pub(super) fn spawn_reminder_loop(&self) -> JoinHandle<()> {
        let context = Arc::clone(&self.context);
        // interval_at panics on a zero period
        let period = self.config.reminder_tick.max(Duration::from_secs(1));
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                if *shutdown.borrow() {
                    break;
                }

                info!("⏰ [REMINDER] Tick started");
                let report = context.run_reminder_tick().await;
                info!(
                    due = report.due,
                    sent = report.sent,
                    failed = report.failed,
                    skipped = report.skipped,
                    "[REMINDER] Tick finished"
                );
            }

            info!("🛑 Reminder loop stopped");
        })
    }

    /// Missed check-in sweep once a day at the configured local time
    pub(super) fn spawn_missed_sweep_loop(&self) -> JoinHandle<()> {
        let context = Arc::clone(&self.context);
        let hour = self.config.missed_sweep_hour;
        let minute = self.config.missed_sweep_minute;
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            loop {
                if *shutdown.borrow() {
                    break;
                }

                let now = context.clock.now();
                let (wait, run_after_wait) = match next_sweep_at(&now, hour, minute) {
                    Some(next_run) => {
                        let wait = (next_run - now)
                            .to_std()
                            .unwrap_or(Duration::from_secs(60));
                        info!(
                            "Next missed check-in sweep: {} (in {} seconds)",
                            next_run.format("%Y-%m-%d %H:%M:%S"),
                            wait.as_secs()
                        );
                        (wait, true)
                    }
                    None => {
                        warn!(
                            "⚠️  Sweep time {}:{:02} does not exist today, retrying later",
                            hour, minute
                        );
                        (UNRESOLVED_SWEEP_RETRY, false)
                    }
                };

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {}
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
                if *shutdown.borrow() {
                    break;
                }
                if !run_after_wait {
                    continue;
                }

                info!("⏰ [MISSED] Sweep started");
                let report = context.run_missed_check_in_sweep().await;
                info!(
                    missed = report.due,
                    sent = report.sent,
                    failed = report.failed,
                    skipped = report.skipped,
                    "[MISSED] Sweep finished"
                );
            }

            info!("🛑 Missed check-in loop stopped");
        })
    }
}

/// Next occurrence of `hour:minute` strictly after `now`, in the zone of `now`.
/// Each candidate is resolved on its own calendar day, so a DST switch in
/// between does not shift the wall-clock time.
pub(super) fn next_sweep_at<Tz: TimeZone>(
    now: &DateTime<Tz>,
    hour: u8,
    minute: u8,
) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let slot_on = |date: NaiveDate| {
        date.and_hms_opt(u32::from(hour), u32::from(minute), 0)?
            .and_local_timezone(tz.clone())
            .earliest()
    };

    let today = now.date_naive();
    match slot_on(today) {
        Some(slot) if slot > *now => Some(slot),
        _ => today.succ_opt().and_then(slot_on),
    }
}
