use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::policy::ReminderPolicy;
use super::value_objects::ReminderFrequency;
use crate::shared::{DomainError, UserId};

const DEFAULT_INTERVAL_HOURS: u32 = 24;
const MAX_INTERVAL_HOURS: u32 = 24 * 30;

/// Partial update of a user's reminder preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub enabled: Option<bool>,
    pub frequency: Option<ReminderFrequency>,
    pub interval_hours: Option<u32>,
}

/// Per-user reminder schedule. One per user; retired by disabling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSubscription {
    user_id: UserId,
    enabled: bool,
    frequency: ReminderFrequency,
    interval_hours: u32,
    next_due: Option<DateTime<Utc>>,
    last_fired: Option<DateTime<Utc>>,
}

impl ReminderSubscription {
    /// Subscription created at registration: daily, first reminder a day later
    pub fn with_defaults(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            enabled: true,
            frequency: ReminderFrequency::Daily,
            interval_hours: DEFAULT_INTERVAL_HOURS,
            next_due: Some(now + Duration::days(1)),
            last_fired: None,
        }
    }

    /// Reconstruct from persistence
    pub fn restore(
        user_id: UserId,
        enabled: bool,
        frequency: ReminderFrequency,
        interval_hours: u32,
        next_due: Option<DateTime<Utc>>,
        last_fired: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            user_id,
            enabled,
            frequency,
            interval_hours,
            // a disabled subscription never carries a due time
            next_due: if enabled { next_due } else { None },
            last_fired,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn frequency(&self) -> ReminderFrequency {
        self.frequency
    }

    pub fn interval_hours(&self) -> u32 {
        self.interval_hours
    }

    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.next_due
    }

    pub fn last_fired(&self) -> Option<DateTime<Utc>> {
        self.last_fired
    }

    /// Whether a reminder should fire at `now`. An enabled subscription
    /// without a due time has never been scheduled and is due immediately.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_due.map_or(true, |due| due <= now)
    }

    /// Recompute `next_due` from the policy
    pub fn reschedule<Tz: TimeZone>(
        &mut self,
        last_check_in: Option<DateTime<Utc>>,
        now: &DateTime<Tz>,
    ) {
        self.next_due = ReminderPolicy::next_due(self, last_check_in, now);
    }

    /// Mark a reminder as sent at `now` and schedule the next one
    pub fn record_fired<Tz: TimeZone>(
        &mut self,
        last_check_in: Option<DateTime<Utc>>,
        now: &DateTime<Tz>,
    ) {
        self.last_fired = Some(now.with_timezone(&Utc));
        self.reschedule(last_check_in, now);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.next_due = None;
    }

    /// Apply user-supplied settings, then recompute or clear `next_due`
    pub fn apply_settings<Tz: TimeZone>(
        &mut self,
        settings: &ReminderSettings,
        last_check_in: Option<DateTime<Utc>>,
        now: &DateTime<Tz>,
    ) -> Result<(), DomainError> {
        if let Some(interval) = settings.interval_hours {
            if interval == 0 || interval > MAX_INTERVAL_HOURS {
                return Err(DomainError::Validation(format!(
                    "Reminder interval must be between 1 and {} hours, got {}",
                    MAX_INTERVAL_HOURS, interval
                )));
            }
            self.interval_hours = interval;
        }

        if let Some(frequency) = settings.frequency {
            self.frequency = frequency;
        }

        if let Some(enabled) = settings.enabled {
            self.enabled = enabled;
        }

        if self.enabled {
            self.reschedule(last_check_in, now);
        } else {
            self.next_due = None;
        }

        Ok(())
    }
}
