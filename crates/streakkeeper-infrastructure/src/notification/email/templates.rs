use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use streakkeeper_domain::notification::{NotificationKind, NotificationMessage};
use streakkeeper_domain::shared::DomainError;
use streakkeeper_domain::user::User;

/// Subject and body of one email, with `{{username}}` / `{{email}}` placeholders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub subject: String,
    pub body: String,
}

impl EmailTemplate {
    fn new(subject: &str, body: &str) -> Self {
        Self {
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }
}

/// Templates keyed by [`NotificationKind::template_key`]
#[derive(Debug, Clone, Default)]
pub struct EmailTemplates {
    templates: HashMap<String, EmailTemplate>,
}

impl EmailTemplates {
    /// Read templates from a JSON file; falls back to the built-in set when
    /// the file does not exist
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        if !path.exists() {
            warn!(
                "Email templates not found at {}, using built-in templates",
                path.display()
            );
            return Ok(Self::builtin());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DomainError::Configuration(format!(
                "Failed to read email templates {}: {}",
                path.display(),
                e
            ))
        })?;

        let templates = Self::from_json(&content)?;
        info!(
            "📧 Loaded {} email templates from {}",
            templates.len(),
            path.display()
        );
        Ok(templates)
    }

    pub fn from_json(content: &str) -> Result<Self, DomainError> {
        let templates: HashMap<String, EmailTemplate> = serde_json::from_str(content)
            .map_err(|e| DomainError::Configuration(format!("Invalid email templates: {}", e)))?;
        Ok(Self { templates })
    }

    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(
            NotificationKind::DailyReminder.template_key().to_string(),
            EmailTemplate::new(
                "Daily check-in reminder",
                "Hi {{username}},\n\nYou have not checked in today yet. Keep your streak going!\n",
            ),
        );
        templates.insert(
            NotificationKind::HourlyReminder.template_key().to_string(),
            EmailTemplate::new(
                "Time to check in",
                "Hi {{username}},\n\nThis is your scheduled check-in reminder.\n",
            ),
        );
        templates.insert(
            NotificationKind::MissedCheckInWarning.template_key().to_string(),
            EmailTemplate::new(
                "You have missed your check-ins",
                "Hi {{username}},\n\nWe have not seen a check-in from you for two days. \
                 Check in today to start a new streak.\n",
            ),
        );
        templates.insert(
            NotificationKind::Welcome.template_key().to_string(),
            EmailTemplate::new(
                "Welcome to StreakKeeper, {{username}}",
                "Hi {{username}},\n\nYour account is ready. Reminders will be sent to {{email}}.\n",
            ),
        );
        templates.insert(
            NotificationKind::TestEmail.template_key().to_string(),
            EmailTemplate::new(
                "StreakKeeper test email",
                "Hi {{username}},\n\nIf you can read this, email delivery works.\n",
            ),
        );
        Self { templates }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Fill in the template for `kind` for `user`
    pub fn render(
        &self,
        kind: NotificationKind,
        user: &User,
    ) -> Result<NotificationMessage, DomainError> {
        let template = self.templates.get(kind.template_key()).ok_or_else(|| {
            DomainError::Notification(format!("Email template '{}' not found", kind))
        })?;

        Ok(NotificationMessage::new(
            fill(&template.subject, user),
            fill(&template.body, user),
        ))
    }
}

fn fill(text: &str, user: &User) -> String {
    text.replace("{{username}}", user.username())
        .replace("{{email}}", user.email())
}
