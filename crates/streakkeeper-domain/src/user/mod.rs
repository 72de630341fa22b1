use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::shared::{DomainError, UserId};

/// Registered user as seen by the reminder engine.
///
/// Credentials and profile data live with the account collaborator; only
/// what notifications need is carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
}

impl User {
    pub fn new(username: String, email: String) -> Result<Self, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::Validation(
                "Username cannot be empty".to_string(),
            ));
        }
        if !email.contains('@') {
            return Err(DomainError::Validation(format!(
                "Invalid email address: {}",
                email
            )));
        }

        Ok(Self {
            id: UserId::new(),
            username,
            email,
        })
    }

    /// Reconstruct from persistence
    pub fn restore(id: UserId, username: String, email: String) -> Self {
        Self {
            id,
            username,
            email,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: &User) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
}
