use serde::{Deserialize, Serialize};
use std::fmt;

use crate::reminder::ReminderFrequency;

/// The notifications the engine can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    DailyReminder,
    HourlyReminder,
    MissedCheckInWarning,
    Welcome,
    TestEmail,
}

impl NotificationKind {
    /// Reminder variant for a subscription's frequency
    pub fn for_frequency(frequency: ReminderFrequency) -> Self {
        match frequency {
            ReminderFrequency::Daily => NotificationKind::DailyReminder,
            ReminderFrequency::Hourly | ReminderFrequency::Custom => {
                NotificationKind::HourlyReminder
            }
        }
    }

    /// Key used to look up the message template
    pub fn template_key(&self) -> &'static str {
        match self {
            NotificationKind::DailyReminder => "daily_reminder",
            NotificationKind::HourlyReminder => "hourly_reminder",
            NotificationKind::MissedCheckInWarning => "missed_checkin_warning",
            NotificationKind::Welcome => "welcome",
            NotificationKind::TestEmail => "test_email",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.template_key())
    }
}

/// Rendered notification ready for a transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub content: String,
}

impl NotificationMessage {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
