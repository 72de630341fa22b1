mod aggregate;
mod missed;
mod repository;
mod streak;


pub use aggregate::CheckInEvent;
pub use missed::{MissedCheckInDetector, MISSED_WINDOW_DAYS};
pub use repository::CheckInRepository;
pub use streak::{StreakCalculator, StreakSummary};
