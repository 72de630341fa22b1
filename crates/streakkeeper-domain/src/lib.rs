// Domain layer - Pure business logic
// No dependencies on infrastructure or application layers

pub mod check_in;
pub mod clock;
pub mod notification;
pub mod reminder;
pub mod shared;
pub mod user;

// Re-exports for convenience
pub use shared::{CheckInId, DomainError, UserId};
