use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::BTreeSet;

use super::aggregate::CheckInEvent;

/// Streak figures derived from one user's check-in history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub total_check_in_days: u32,
    pub last_check_in_date: Option<NaiveDate>,
}

/// Computes consecutive-day check-in streaks
pub struct StreakCalculator;

impl StreakCalculator {
    /// Number of consecutive calendar days, ending today, with a check-in.
    ///
    /// `events` must be ordered newest first. Calendar days are taken in the
    /// zone of `now`. Events stamped after `now` are ignored.
    pub fn current_streak<Tz: TimeZone>(events: &[CheckInEvent], now: &DateTime<Tz>) -> u32 {
        let tz = now.timezone();
        let now_utc = now.with_timezone(&Utc);
        let mut cursor = now.date_naive();
        let mut streak = 0u32;

        for event in events {
            if event.checked_in_at() > now_utc {
                continue;
            }

            let date = event.local_date(&tz);
            if date == cursor {
                streak += 1;
                cursor = match cursor.pred_opt() {
                    Some(previous) => previous,
                    None => break,
                };
            } else if date > cursor {
                // Same day as one already counted, or out of order
                continue;
            } else {
                break;
            }
        }

        streak
    }

    /// Current streak plus distinct-day totals for the supplied history
    pub fn summarize<Tz: TimeZone>(events: &[CheckInEvent], now: &DateTime<Tz>) -> StreakSummary {
        let tz = now.timezone();
        let now_utc = now.with_timezone(&Utc);

        let days: BTreeSet<NaiveDate> = events
            .iter()
            .filter(|event| event.checked_in_at() <= now_utc)
            .map(|event| event.local_date(&tz))
            .collect();

        StreakSummary {
            current_streak: Self::current_streak(events, now),
            total_check_in_days: days.len() as u32,
            last_check_in_date: days.iter().next_back().copied(),
        }
    }
}
