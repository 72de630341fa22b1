use serde::{Deserialize, Serialize};

use streakkeeper_domain::check_in::CheckInEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInDto {
    pub id: String,
    pub checked_in_at: String, // RFC 3339
    pub note: Option<String>,
}

impl From<&CheckInEvent> for CheckInDto {
    fn from(event: &CheckInEvent) -> Self {
        Self {
            id: event.id().to_string(),
            checked_in_at: event.checked_in_at().to_rfc3339(),
            note: event.note().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInStatusDto {
    pub user_id: String,
    pub today_checked: bool,
    pub consecutive_days: u32,
    pub month_count: u64,
    /// Distinct check-in days within the recent window
    pub recent_check_in_days: u32,
    pub last_check_in: Option<CheckInDto>,
    pub recent_check_ins: Vec<CheckInDto>,
}
