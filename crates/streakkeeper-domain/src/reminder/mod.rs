mod aggregate;
mod policy;
mod repository;
mod value_objects;

pub use aggregate::{ReminderSettings, ReminderSubscription};
pub use policy::{ReminderPolicy, DAILY_REMINDER_HOUR, MIN_INTERVAL_HOURS};
pub use repository::ReminderRepository;
pub use value_objects::ReminderFrequency;
