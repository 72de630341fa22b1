use std::path::PathBuf;
use tracing::{error, info};

use streakkeeper_domain::shared::DomainError;
use streakkeeper_infrastructure::config::AppConfig;

/// Configuration read before any log subscriber exists.
///
/// The outcome is held back and reported by [`StartupConfig::finish`] once
/// logging is up, so config errors reach the log file as well.
pub struct StartupConfig {
    path: PathBuf,
    from_file: bool,
    loaded: Result<AppConfig, DomainError>,
}

impl StartupConfig {
    pub fn load(path: PathBuf) -> Self {
        let from_file = path.exists();
        let loaded = AppConfig::load(Some(&path));

        Self {
            path,
            from_file,
            loaded,
        }
    }

    /// Where to write logs, usable even when the config is broken
    pub fn log_dir(&self) -> PathBuf {
        match &self.loaded {
            Ok(config) => config.log_dir.clone(),
            Err(_) => {
                let mut fallback = AppConfig::default();
                let _ = fallback.apply_overrides(|key| std::env::var(key).ok());
                fallback.log_dir
            }
        }
    }

    /// Log how the configuration was obtained and hand it over
    pub fn finish(self) -> Result<AppConfig, DomainError> {
        match self.loaded {
            Ok(config) => {
                if self.from_file {
                    info!("📁 Config loaded from: {}", self.path.display());
                } else {
                    info!(
                        "📁 No config file at {}, using defaults and environment",
                        self.path.display()
                    );
                }
                Ok(config)
            }
            Err(e) => {
                error!(
                    "❌ Failed to load config {}: {}",
                    self.path.display(),
                    e.format_with_code()
                );
                Err(e)
            }
        }
    }
}
