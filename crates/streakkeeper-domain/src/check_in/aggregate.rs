use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::{CheckInId, UserId};

/// A single accepted check-in. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckInEvent {
    id: CheckInId,
    user_id: UserId,
    checked_in_at: DateTime<Utc>,
    note: Option<String>,
}

impl CheckInEvent {
    pub fn new(user_id: UserId, checked_in_at: DateTime<Utc>, note: Option<String>) -> Self {
        Self {
            id: CheckInId::new(),
            user_id,
            checked_in_at,
            note: note.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Reconstruct from persistence
    pub fn restore(
        id: CheckInId,
        user_id: UserId,
        checked_in_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            checked_in_at,
            note,
        }
    }

    pub fn id(&self) -> &CheckInId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn checked_in_at(&self) -> DateTime<Utc> {
        self.checked_in_at
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    /// Calendar date of the check-in as seen from the given zone
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.checked_in_at.with_timezone(tz).date_naive()
    }

    pub fn is_on<Tz: TimeZone>(&self, date: NaiveDate, tz: &Tz) -> bool {
        self.local_date(tz) == date
    }
}
