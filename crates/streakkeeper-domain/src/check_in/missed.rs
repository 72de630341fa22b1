use chrono::{DateTime, Duration, TimeZone, Utc};

use super::aggregate::CheckInEvent;

/// Trailing window fetched for the missed check-in sweep.
///
/// Wider than the two days inspected so that events near midnight are not
/// under-fetched.
pub const MISSED_WINDOW_DAYS: i64 = 3;

pub struct MissedCheckInDetector;

impl MissedCheckInDetector {
    /// Start of the window to load before calling [`Self::is_missed`]
    pub fn window_start<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
        now.with_timezone(&Utc) - Duration::days(MISSED_WINDOW_DAYS)
    }

    /// A user is "missed" when there is no check-in today and none yesterday.
    /// One missed day alone does not count.
    pub fn is_missed<Tz: TimeZone>(events: &[CheckInEvent], now: &DateTime<Tz>) -> bool {
        let tz = now.timezone();
        let today = now.date_naive();
        let yesterday = today.pred_opt();

        let mut has_today = false;
        let mut has_yesterday = false;

        for event in events {
            let date = event.local_date(&tz);
            if date == today {
                has_today = true;
            }
            if Some(date) == yesterday {
                has_yesterday = true;
            }
        }

        !has_today && !has_yesterday
    }
}
