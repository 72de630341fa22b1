mod dispatch;
mod reminder_service;
mod scheduler;

pub use reminder_service::ReminderService;
pub use scheduler::{ReminderScheduler, SchedulerConfig, TickReport};
