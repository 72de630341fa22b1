use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::aggregate::CheckInEvent;
use crate::shared::{DomainError, UserId};

#[async_trait]
pub trait CheckInRepository: Send + Sync {
    /// Persist a new check-in event
    async fn save(&self, event: &CheckInEvent) -> Result<(), DomainError>;

    /// Check-ins at or after `since`, newest first
    async fn find_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckInEvent>, DomainError>;

    /// Timestamp of the most recent check-in, if any
    async fn find_latest_at(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, DomainError>;

    async fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64, DomainError>;
}
