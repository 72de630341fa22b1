use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use streakkeeper_domain::check_in::{CheckInEvent, CheckInRepository};
use streakkeeper_domain::shared::{CheckInId, DomainError, UserId};

use crate::persistence::RepositoryErrorMapper;

#[derive(FromRow)]
struct CheckInRow {
    id: String,
    user_id: String,
    checked_in_at: DateTime<Utc>,
    note: Option<String>,
}

impl CheckInRow {
    fn into_event(self) -> CheckInEvent {
        CheckInEvent::restore(
            CheckInId::from_string(&self.id),
            UserId::from_string(&self.user_id),
            self.checked_in_at,
            self.note,
        )
    }
}

pub struct SqliteCheckInRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteCheckInRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckInRepository for SqliteCheckInRepository {
    async fn save(&self, event: &CheckInEvent) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO check_ins (id, user_id, checked_in_at, note, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
        "#;

        sqlx::query(query)
            .bind(event.id().as_str())
            .bind(event.user_id().as_str())
            .bind(event.checked_in_at())
            .bind(event.note())
            .bind(Utc::now())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save check-in"))?;

        Ok(())
    }

    async fn find_since(
        &self,
        user_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<Vec<CheckInEvent>, DomainError> {
        let query = r#"
            SELECT id, user_id, checked_in_at, note
            FROM check_ins
            WHERE user_id = ?1 AND checked_in_at >= ?2
            ORDER BY checked_in_at DESC
        "#;

        let rows: Vec<CheckInRow> = sqlx::query_as(query)
            .bind(user_id.as_str())
            .bind(since)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find check-ins since"))?;

        Ok(rows.into_iter().map(CheckInRow::into_event).collect())
    }

    async fn find_latest_at(&self, user_id: &UserId) -> Result<Option<DateTime<Utc>>, DomainError> {
        let query = r#"
            SELECT checked_in_at
            FROM check_ins
            WHERE user_id = ?1
            ORDER BY checked_in_at DESC
            LIMIT 1
        "#;

        sqlx::query_scalar(query)
            .bind(user_id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find latest check-in"))
    }

    async fn count_since(&self, user_id: &UserId, since: DateTime<Utc>) -> Result<u64, DomainError> {
        let query = "SELECT COUNT(*) FROM check_ins WHERE user_id = ?1 AND checked_in_at >= ?2";

        let count: i64 = sqlx::query_scalar(query)
            .bind(user_id.as_str())
            .bind(since)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Count check-ins"))?;

        Ok(count.max(0) as u64)
    }
}
