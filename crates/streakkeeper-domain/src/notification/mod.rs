mod notifier;
mod value_objects;

pub use notifier::ReminderNotifier;
pub use value_objects::{NotificationKind, NotificationMessage};
