mod email;
mod log_notifier;
mod notifier_factory;

pub use email::{EmailNotifier, EmailTemplate, EmailTemplates};
pub use log_notifier::LogNotifier;
pub use notifier_factory::create_notifier;
