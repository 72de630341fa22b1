mod check_in_repo;
mod reminder_repo;
mod user_repo;

pub use check_in_repo::SqliteCheckInRepository;
pub use reminder_repo::SqliteReminderRepository;
pub use user_repo::SqliteUserRepository;
