use async_trait::async_trait;

use crate::shared::DomainError;
use crate::user::User;

/// Outbound notification capability used by the scheduler and by the
/// account use cases.
///
/// Each call fails independently; a failure for one user must not affect
/// the others in the same batch.
#[async_trait]
pub trait ReminderNotifier: Send + Sync {
    async fn send_daily_reminder(&self, user: &User) -> Result<(), DomainError>;

    async fn send_hourly_reminder(&self, user: &User) -> Result<(), DomainError>;

    async fn send_missed_warning(&self, user: &User) -> Result<(), DomainError>;

    /// Sent once, right after registration
    async fn send_welcome(&self, user: &User) -> Result<(), DomainError>;

    /// Sent on request so users can verify delivery
    async fn send_test(&self, user: &User) -> Result<(), DomainError>;
}
