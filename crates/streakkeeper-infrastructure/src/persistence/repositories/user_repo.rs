use async_trait::async_trait;
use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use streakkeeper_domain::shared::{DomainError, UserId};
use streakkeeper_domain::user::{User, UserRepository};

use crate::persistence::RepositoryErrorMapper;

#[derive(FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User::restore(UserId::from_string(&self.id), self.username, self.email)
    }
}

pub struct SqliteUserRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteUserRepository {
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        let query = r#"
            INSERT INTO users (id, username, email, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET
                username = ?2,
                email = ?3
        "#;

        sqlx::query(query)
            .bind(user.id().as_str())
            .bind(user.username())
            .bind(user.email())
            .bind(Utc::now())
            .execute(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Save user"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let query = "SELECT id, username, email FROM users WHERE id = ?1";

        let row: Option<UserRow> = sqlx::query_as(query)
            .bind(id.as_str())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find user by ID"))?;

        Ok(row.map(UserRow::into_user))
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let query = "SELECT id, username, email FROM users ORDER BY username ASC";

        let rows: Vec<UserRow> = sqlx::query_as(query)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| RepositoryErrorMapper::map_sqlx_error(e, "Find all users"))?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}
