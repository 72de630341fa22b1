use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// How often a subscription wants to be reminded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReminderFrequency {
    /// Once a day at a fixed wall-clock hour
    #[default]
    Daily,
    /// Every `interval_hours`, chained off the previous firing
    Hourly,
    /// Every `interval_hours` from the moment of recomputation
    Custom,
}

impl ReminderFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderFrequency::Daily => "daily",
            ReminderFrequency::Hourly => "hourly",
            ReminderFrequency::Custom => "custom",
        }
    }

    /// Parse a stored tag, treating anything unrecognized as `Hourly`.
    ///
    /// Returns the parsed value and whether the fallback was taken, so the
    /// caller can report bad data without failing the scan.
    pub fn from_tag_or_hourly(tag: &str) -> (Self, bool) {
        match tag.parse() {
            Ok(frequency) => (frequency, false),
            Err(_) => (ReminderFrequency::Hourly, true),
        }
    }
}

impl FromStr for ReminderFrequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(ReminderFrequency::Daily),
            "hourly" => Ok(ReminderFrequency::Hourly),
            "custom" => Ok(ReminderFrequency::Custom),
            other => Err(DomainError::Validation(format!(
                "Unknown reminder frequency: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ReminderFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
