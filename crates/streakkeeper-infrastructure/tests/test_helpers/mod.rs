#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

use streakkeeper_domain::user::{User, UserRepository};
use streakkeeper_infrastructure::persistence::repositories::SqliteUserRepository;
use streakkeeper_infrastructure::persistence::Database;

/// Fresh in-memory database with all migrations applied
pub async fn setup_in_memory_db() -> Arc<SqlitePool> {
    let database = Database::in_memory()
        .await
        .expect("Failed to open in-memory database");
    database
        .run_migrations()
        .await
        .expect("Failed to run migrations");
    Arc::new(database.pool().clone())
}

/// Persist a user so rows referencing it satisfy the foreign keys
pub async fn seed_user(pool: &Arc<SqlitePool>, username: &str) -> User {
    let user = User::new(username.to_string(), format!("{}@example.com", username))
        .expect("Create user");
    SqliteUserRepository::new(pool.clone())
        .save(&user)
        .await
        .expect("Save user");
    user
}

pub fn utc(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
}
