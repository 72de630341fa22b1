mod sender;
mod templates;

use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, Tokio1Executor};
use std::time::Duration;

use streakkeeper_domain::shared::DomainError;

use crate::config::SmtpSettings;

pub use templates::{EmailTemplate, EmailTemplates};

/// SMTP notifier rendering [`EmailTemplates`] for each reminder kind
pub struct EmailNotifier {
    from: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
    templates: EmailTemplates,
}

impl EmailNotifier {
    pub fn new(
        settings: &SmtpSettings,
        templates: EmailTemplates,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let from: Mailbox = settings.email.parse().map_err(|e| {
            DomainError::Configuration(format!(
                "Invalid sender address '{}': {}",
                settings.email, e
            ))
        })?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| {
                DomainError::Configuration(format!(
                    "Invalid SMTP host '{}': {}",
                    settings.host, e
                ))
            })?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.email.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(timeout))
            .build();

        Ok(Self {
            from,
            transport,
            templates,
        })
    }

    fn parse_recipient(email: &str) -> Result<Mailbox, DomainError> {
        email.parse().map_err(|e| {
            DomainError::Notification(format!("Invalid recipient address '{}': {}", email, e))
        })
    }
}
