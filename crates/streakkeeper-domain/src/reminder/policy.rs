use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};

use super::aggregate::ReminderSubscription;
use super::value_objects::ReminderFrequency;

/// Wall-clock hour at which daily reminders go out
pub const DAILY_REMINDER_HOUR: u32 = 9;

/// Shortest interval honored for hourly/custom schedules
pub const MIN_INTERVAL_HOURS: u32 = 1;

/// Computes when a subscription is next due
pub struct ReminderPolicy;

impl ReminderPolicy {
    /// Next due time for `subscription`, or `None` when it is disabled.
    ///
    /// - daily: next `DAILY_REMINDER_HOUR`:00 in the zone of `now`, strictly after `now`
    /// - hourly: interval after the last firing, else the last check-in, else `now`
    /// - custom: interval after `now`
    pub fn next_due<Tz: TimeZone>(
        subscription: &ReminderSubscription,
        last_check_in: Option<DateTime<Utc>>,
        now: &DateTime<Tz>,
    ) -> Option<DateTime<Utc>> {
        if !subscription.is_enabled() {
            return None;
        }

        let now_utc = now.with_timezone(&Utc);
        let interval = Duration::hours(i64::from(
            subscription.interval_hours().max(MIN_INTERVAL_HOURS),
        ));

        let next = match subscription.frequency() {
            ReminderFrequency::Daily => Self::next_daily(now),
            ReminderFrequency::Hourly => {
                let basis = subscription
                    .last_fired()
                    .or(last_check_in)
                    .unwrap_or(now_utc);
                basis + interval
            }
            ReminderFrequency::Custom => now_utc + interval,
        };

        Some(next)
    }

    fn next_daily<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
        let tz = now.timezone();
        let now_utc = now.with_timezone(&Utc);
        let today = now.date_naive();

        Self::daily_slot(&tz, today)
            .filter(|slot| *slot > now_utc)
            .or_else(|| {
                today
                    .succ_opt()
                    .and_then(|tomorrow| Self::daily_slot(&tz, tomorrow))
            })
            .unwrap_or(now_utc + Duration::days(1))
    }

    /// The reminder hour on `date`; an hour later if the clock skips it
    fn daily_slot<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
        let wall = date.and_hms_opt(DAILY_REMINDER_HOUR, 0, 0)?;
        tz.from_local_datetime(&wall)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(wall + Duration::hours(1))).earliest())
            .map(|slot| slot.with_timezone(&Utc))
    }
}
