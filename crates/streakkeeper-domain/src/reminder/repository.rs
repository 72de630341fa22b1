use async_trait::async_trait;

use super::aggregate::ReminderSubscription;
use crate::shared::{DomainError, UserId};

#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Insert or replace the subscription of its user
    async fn save(&self, subscription: &ReminderSubscription) -> Result<(), DomainError>;

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReminderSubscription>, DomainError>;

    /// All subscriptions with reminders switched on
    async fn find_enabled(&self) -> Result<Vec<ReminderSubscription>, DomainError>;
}
