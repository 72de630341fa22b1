use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            pub fn from_string(s: &str) -> Self {
                Self(s.to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

define_id!(UserId);
define_id!(CheckInId);

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Resource Not Found (2xxx)
    UserNotFound = 2001,
    SubscriptionNotFound = 2002,

    // Business Logic (3xxx)
    AlreadyCheckedIn = 3001,

    // Data & Persistence (4xxx)
    RepositoryError = 4001,
    DatabaseConstraintViolation = 4002,

    // Infrastructure (5xxx)
    InfrastructureError = 5001,
    NotificationError = 5002,
    TimeoutError = 5003,

    // Validation (6xxx)
    ValidationError = 6001,
    ConfigurationError = 6002,
}

impl ErrorCode {
    /// Get error code as integer
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Transient failures are expected to clear up on a later tick
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ErrorCode::RepositoryError
                | ErrorCode::InfrastructureError
                | ErrorCode::NotificationError
                | ErrorCode::TimeoutError
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Reminder subscription not found: {0}")]
    SubscriptionNotFound(String),

    #[error("Already checked in: {0}")]
    AlreadyCheckedIn(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl DomainError {
    /// Get error code
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::UserNotFound(_) => ErrorCode::UserNotFound,
            DomainError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            DomainError::AlreadyCheckedIn(_) => ErrorCode::AlreadyCheckedIn,
            DomainError::Repository(_) => ErrorCode::RepositoryError,
            DomainError::ConstraintViolation(_) => ErrorCode::DatabaseConstraintViolation,
            DomainError::Infrastructure(_) => ErrorCode::InfrastructureError,
            DomainError::Notification(_) => ErrorCode::NotificationError,
            DomainError::Timeout(_) => ErrorCode::TimeoutError,
            DomainError::Validation(_) => ErrorCode::ValidationError,
            DomainError::Configuration(_) => ErrorCode::ConfigurationError,
        }
    }

    /// Get error message
    pub fn message(&self) -> &str {
        match self {
            DomainError::UserNotFound(msg)
            | DomainError::SubscriptionNotFound(msg)
            | DomainError::AlreadyCheckedIn(msg)
            | DomainError::Repository(msg)
            | DomainError::ConstraintViolation(msg)
            | DomainError::Infrastructure(msg)
            | DomainError::Notification(msg)
            | DomainError::Timeout(msg)
            | DomainError::Validation(msg)
            | DomainError::Configuration(msg) => msg,
        }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }

    /// Format error with code
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}
