use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use streakkeeper_domain::shared::DomainError;

/// Scheduler cadence and limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    /// Period of the reminder tick
    pub reminder_tick_secs: u64,
    /// Local wall-clock time of the daily missed check-in sweep
    pub missed_sweep_hour: u8,
    pub missed_sweep_minute: u8,
    /// Upper bound for one notification send
    pub notification_timeout_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            reminder_tick_secs: 3600,
            missed_sweep_hour: 8,
            missed_sweep_minute: 0,
            notification_timeout_secs: 30,
        }
    }
}

/// Outgoing mail server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    /// Sender address, also used as the login
    pub email: String,
    pub password: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            email: String::new(),
            password: String::new(),
        }
    }
}

impl SmtpSettings {
    pub fn is_configured(&self) -> bool {
        !self.email.trim().is_empty() && !self.host.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub log_dir: PathBuf,
    pub templates_path: PathBuf,
    pub scheduler: SchedulerSettings,
    pub smtp: SmtpSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        let data_dir = default_data_dir();
        let db_filename = if cfg!(debug_assertions) {
            "streakkeeper-dev.db"
        } else {
            "streakkeeper.db"
        };

        Self {
            database_path: data_dir.join(db_filename),
            log_dir: data_dir.join("logs"),
            templates_path: PathBuf::from("config").join("email_templates.json"),
            scheduler: SchedulerSettings::default(),
            smtp: SmtpSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load from an optional JSON file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, DomainError> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path).map_err(|e| {
                    DomainError::Configuration(format!(
                        "Failed to read config {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
                    DomainError::Configuration(format!(
                        "Invalid config {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                config
            }
            _ => AppConfig::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from `lookup` (environment variables in production)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = get("STREAKKEEPER_DATABASE_PATH") {
            self.database_path = PathBuf::from(value);
        }
        if let Some(value) = get("STREAKKEEPER_LOG_DIR") {
            self.log_dir = PathBuf::from(value);
        }
        if let Some(value) = get("STREAKKEEPER_TEMPLATES") {
            self.templates_path = PathBuf::from(value);
        }
        if let Some(value) = get("STREAKKEEPER_REMINDER_TICK_SECS") {
            self.scheduler.reminder_tick_secs = parse_number("STREAKKEEPER_REMINDER_TICK_SECS", &value)?;
        }
        if let Some(value) = get("STREAKKEEPER_MISSED_SWEEP_HOUR") {
            self.scheduler.missed_sweep_hour = parse_number("STREAKKEEPER_MISSED_SWEEP_HOUR", &value)?;
        }
        if let Some(value) = get("STREAKKEEPER_MISSED_SWEEP_MINUTE") {
            self.scheduler.missed_sweep_minute =
                parse_number("STREAKKEEPER_MISSED_SWEEP_MINUTE", &value)?;
        }
        if let Some(value) = get("STREAKKEEPER_NOTIFICATION_TIMEOUT_SECS") {
            self.scheduler.notification_timeout_secs =
                parse_number("STREAKKEEPER_NOTIFICATION_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = get("SMTP_HOST") {
            self.smtp.host = value;
        }
        if let Some(value) = get("SMTP_PORT") {
            self.smtp.port = parse_number("SMTP_PORT", &value)?;
        }
        if let Some(value) = get("SMTP_EMAIL") {
            self.smtp.email = value;
        }
        if let Some(value) = get("SMTP_PASSWORD") {
            self.smtp.password = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let scheduler = &self.scheduler;

        if scheduler.reminder_tick_secs == 0 {
            return Err(DomainError::Configuration(
                "reminder_tick_secs must be greater than zero".to_string(),
            ));
        }
        if scheduler.missed_sweep_hour > 23 || scheduler.missed_sweep_minute > 59 {
            return Err(DomainError::Configuration(format!(
                "Invalid missed sweep time {}:{:02}",
                scheduler.missed_sweep_hour, scheduler.missed_sweep_minute
            )));
        }
        if scheduler.notification_timeout_secs == 0 {
            return Err(DomainError::Configuration(
                "notification_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("streakkeeper")
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value.trim().parse().map_err(|_| {
        DomainError::Configuration(format!("{} has an invalid value: {}", key, value))
    })
}
