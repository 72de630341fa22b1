use std::sync::Arc;

use crate::application::queries::CheckInStatusQueries;
use crate::application::services::{ReminderScheduler, ReminderService};
use streakkeeper_domain::check_in::CheckInRepository;
use streakkeeper_domain::notification::ReminderNotifier;
use streakkeeper_domain::reminder::ReminderRepository;
use streakkeeper_domain::user::UserRepository;
use streakkeeper_infrastructure::config::AppConfig;
use streakkeeper_infrastructure::persistence::Database;

pub struct Runtime {
    pub config: AppConfig,
    pub db: Arc<Database>,
    pub notifier: Arc<dyn ReminderNotifier>,
}

pub struct Repositories {
    pub user: Arc<dyn UserRepository>,
    pub check_in: Arc<dyn CheckInRepository>,
    pub reminder: Arc<dyn ReminderRepository>,
}

pub struct Services {
    pub reminder: Arc<ReminderService>,
    pub scheduler: Arc<ReminderScheduler>,
}

pub struct Queries {
    pub status: Arc<CheckInStatusQueries>,
}

pub struct AppState {
    pub runtime: Runtime,
    pub repositories: Repositories,
    pub services: Services,
    pub queries: Queries,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        crate::presentation::bootstrap::build_app_state(config).await
    }
}
