use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;
use tracing::warn;

use streakkeeper_domain::reminder::{ReminderFrequency, ReminderRepository, ReminderSubscription};
use streakkeeper_domain::shared::{DomainError, UserId};

use crate::persistence::RepositoryErrorMapper;

#[derive(FromRow)]
struct ReminderRow {
    user_id: String,
    enabled: bool,
    frequency: String,
    interval_hours: i64,
    next_due: Option<DateTime<Utc>>,
    last_fired: Option<DateTime<Utc>>,
}

impl ReminderRow {
    fn into_subscription(self) -> Result<ReminderSubscription, DomainError> {
        let (frequency, fell_back) = ReminderFrequency::from_tag_or_hourly(&self.frequency);
        if fell_back {
            warn!(
                user_id = %self.user_id,
                frequency = %self.frequency,
                "Unknown reminder frequency, treating as hourly"
            );
        }

        let interval_hours = u32::try_from(self.interval_hours).map_err(|_| {
            DomainError::Repository(format!(
                "Invalid interval_hours {} for user {}",
                self.interval_hours, self.user_id
            ))
        })?;

        Ok(ReminderSubscription::restore(
            UserId::from_string(&self.user_id),
            self.enabled,
            frequency,
            interval_hours,
            self.next_due,
            self.last_fired,
        ))
    }
}

const SELECT_COLUMNS: &str =
    "SELECT user_id, enabled, frequency, interval_hours, next_due, last_fired FROM reminder_subscriptions";

pub struct SqliteReminderRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteReminderRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderRepository for SqliteReminderRepository {
    async fn save(&self, subscription: &ReminderSubscription) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO reminder_subscriptions
                (user_id, enabled, frequency, interval_hours, next_due, last_fired, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                enabled = ?2,
                frequency = ?3,
                interval_hours = ?4,
                next_due = ?5,
                last_fired = ?6,
                updated_at = ?7
        "#;

        sqlx::query(query)
            .bind(subscription.user_id().as_str())
            .bind(subscription.is_enabled())
            .bind(subscription.frequency().as_str())
            .bind(i64::from(subscription.interval_hours()))
            .bind(subscription.next_due())
            .bind(subscription.last_fired())
            .bind(Utc::now())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save reminder subscription"))?;

        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReminderSubscription>, DomainError> {
        let query = format!("{} WHERE user_id = ?1", SELECT_COLUMNS);

        let row: Option<ReminderRow> = sqlx::query_as(&query)
            .bind(user_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| {
                RepositoryErrorMapper::map_sqlx_error(e, "Find reminder subscription by user")
            })?;

        row.map(ReminderRow::into_subscription).transpose()
    }

    async fn find_enabled(&self) -> Result<Vec<ReminderSubscription>, DomainError> {
        let query = format!("{} WHERE enabled = 1 ORDER BY next_due ASC", SELECT_COLUMNS);

        let rows: Vec<ReminderRow> = sqlx::query_as(&query)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| {
                RepositoryErrorMapper::map_sqlx_error(e, "Find enabled reminder subscriptions")
            })?;

        let mut subscriptions = Vec::with_capacity(rows.len());
        for row in rows {
            match row.into_subscription() {
                Ok(subscription) => subscriptions.push(subscription),
                Err(e) => warn!("Skipping unreadable reminder subscription: {}", e),
            }
        }

        Ok(subscriptions)
    }
}
